use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
    pub(crate) default_value: String,
    pub(crate) disabled: bool,
    // Inline style, insertion-ordered so serialization stays stable.
    pub(crate) style: Vec<(String, String)>,
}

impl Element {
    pub(crate) fn style_value(&self, property: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn set_style(&mut self, property: &str, value: &str) {
        if let Some(entry) = self.style.iter_mut().find(|(name, _)| name == property) {
            entry.1 = value.to_string();
        } else {
            self.style.push((property.to_string(), value.to_string()));
        }
    }

    pub(crate) fn remove_style(&mut self, property: &str) {
        self.style.retain(|(name, _)| name != property);
    }
}

pub(crate) fn parse_inline_style(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

pub(crate) fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

pub(crate) fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| {
            value
                .split_whitespace()
                .filter(|token| !token.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

pub(crate) fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub(crate) fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let mut attrs = attrs;
        let value = attrs.get("value").cloned().unwrap_or_default();
        let disabled = attrs.contains_key("disabled");
        let style = attrs
            .remove("style")
            .map(|raw| parse_inline_style(&raw))
            .unwrap_or_default();
        let element = Element {
            tag_name,
            attrs,
            default_value: value.clone(),
            value,
            disabled,
            style,
        };
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            self.id_index.entry(id_attr).or_insert(id);
        }
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node_id.0].node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes[node_id.0].parent
    }

    pub(crate) fn children(&self, node_id: NodeId) -> &[NodeId] {
        &self.nodes[node_id.0].children
    }

    pub(crate) fn is_descendant_of(&self, node_id: NodeId, ancestor: NodeId) -> bool {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// The node itself, or the nearest ancestor element, satisfying `pred`.
    pub(crate) fn closest(
        &self,
        node_id: NodeId,
        pred: impl Fn(&Dom, NodeId) -> bool,
    ) -> Option<NodeId> {
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if self.element(current).is_some() && pred(self, current) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub(crate) fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub(crate) fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|element| element.attrs.get(name).cloned())
    }

    pub(crate) fn text_content(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
        }
    }

    pub(crate) fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.element(node_id).is_none() {
            return Err(Error::Harness(
                "text content target is not an element".into(),
            ));
        }
        self.nodes[node_id.0].children.clear();
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        Ok(())
    }

    pub(crate) fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Harness("value target is not an element".into()))?;
        Ok(element.value.clone())
    }

    pub(crate) fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Harness("value target is not an element".into()))?;
        element.value = value.to_string();
        Ok(())
    }

    pub(crate) fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id)
            .map(|element| element.disabled)
            .unwrap_or(false)
    }

    pub(crate) fn set_disabled(&mut self, node_id: NodeId, disabled: bool) {
        if let Some(element) = self.element_mut(node_id) {
            element.disabled = disabled;
        }
    }

    pub(crate) fn add_class(&mut self, node_id: NodeId, class_name: &str) {
        if let Some(element) = self.element_mut(node_id) {
            let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
            if !classes.iter().any(|c| c == class_name) {
                classes.push(class_name.to_string());
            }
            set_class_attr(element, &classes);
        }
    }

    pub(crate) fn remove_class(&mut self, node_id: NodeId, class_name: &str) {
        if let Some(element) = self.element_mut(node_id) {
            let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
            classes.retain(|c| c != class_name);
            set_class_attr(element, &classes);
        }
    }

    pub(crate) fn set_class_state(&mut self, node_id: NodeId, class_name: &str, on: bool) {
        if on {
            self.add_class(node_id, class_name);
        } else {
            self.remove_class(node_id, class_name);
        }
    }

    pub(crate) fn has_class_on(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .map(|element| has_class(element, class_name))
            .unwrap_or(false)
    }

    pub(crate) fn style_value(&self, node_id: NodeId, property: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|element| element.style_value(property).map(ToOwned::to_owned))
    }

    pub(crate) fn set_style(&mut self, node_id: NodeId, property: &str, value: &str) {
        if let Some(element) = self.element_mut(node_id) {
            element.set_style(property, value);
        }
    }

    pub(crate) fn remove_style(&mut self, node_id: NodeId, property: &str) {
        if let Some(element) = self.element_mut(node_id) {
            element.remove_style(property);
        }
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_element_nodes(self.root, &mut out);
        out
    }

    fn collect_element_nodes(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        if self.element(node_id).is_some() {
            out.push(node_id);
        }
        for child in &self.nodes[node_id.0].children {
            self.collect_element_nodes(*child, out);
        }
    }

    pub(crate) fn descendant_elements(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for child in &self.nodes[node_id.0].children {
            self.collect_element_nodes(*child, &mut out);
        }
        out
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if self
                .tag_name(current)
                .map(|t| t.eq_ignore_ascii_case(tag))
                .unwrap_or(false)
            {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    pub(crate) fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.all_element_nodes().into_iter().find(|node| {
            self.tag_name(*node)
                .map(|t| t.eq_ignore_ascii_case(tag))
                .unwrap_or(false)
        })
    }

    /// Moves `child` to the end of `parent`'s child list. Used when sorted
    /// product cards are re-appended to the grid.
    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent {
            let siblings = &mut self.nodes[old_parent.0].children;
            siblings.retain(|id| *id != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Textarea default text and select option sync, run once after parsing.
    pub(crate) fn initialize_form_control_values(&mut self) {
        let nodes = self.all_element_nodes();
        for node in nodes {
            let tag = self
                .tag_name(node)
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            if tag == "textarea" {
                let text = self.text_content(node);
                if let Some(element) = self.element_mut(node) {
                    element.value = text.clone();
                    element.default_value = text;
                }
            } else if tag == "select" {
                self.sync_select_value(node);
            }
        }
    }

    fn sync_select_value(&mut self, select_node: NodeId) {
        let options = self
            .descendant_elements(select_node)
            .into_iter()
            .filter(|node| {
                self.tag_name(*node)
                    .map(|t| t.eq_ignore_ascii_case("option"))
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();

        let selected = options
            .iter()
            .copied()
            .find(|option| {
                self.element(*option)
                    .map(|e| e.attrs.contains_key("selected"))
                    .unwrap_or(false)
            })
            .or_else(|| options.first().copied());

        let value = selected
            .map(|option| self.option_effective_value(option))
            .unwrap_or_default();
        if let Some(element) = self.element_mut(select_node) {
            element.value = value.clone();
            element.default_value = value;
        }
    }

    fn option_effective_value(&self, option: NodeId) -> String {
        self.attr(option, "value")
            .unwrap_or_else(|| self.text_content(option).trim().to_string())
    }

    /// Restores every control under `form` to its parse-time default.
    pub(crate) fn reset_form(&mut self, form: NodeId) {
        for node in self.descendant_elements(form) {
            let tag = self
                .tag_name(node)
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            if tag == "input" || tag == "textarea" || tag == "select" {
                if let Some(element) = self.element_mut(node) {
                    element.value = element.default_value.clone();
                }
            }
        }
    }

    pub(crate) fn dump_node(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Text(text) => text.clone(),
            NodeType::Document => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out
            }
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                let mut attr_names = element.attrs.keys().collect::<Vec<_>>();
                attr_names.sort();
                for name in attr_names {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&element.attrs[name]);
                    out.push('"');
                }
                if !element.style.is_empty() {
                    out.push_str(" style=\"");
                    for (idx, (name, value)) in element.style.iter().enumerate() {
                        if idx > 0 {
                            out.push(' ');
                        }
                        out.push_str(name);
                        out.push_str(": ");
                        out.push_str(value);
                        out.push(';');
                    }
                    out.push('"');
                }
                out.push('>');
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        }
    }
}
