use std::path::Path;

use crate::error::AppError;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    /// Processing instruction content, without the `<?` `?>` delimiters.
    Instruction(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written, e.g. `disk` or `qemu:commandline`.
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

/// Selects direct children by tag and, optionally, by attribute values.
#[derive(Debug, Clone)]
pub struct Match<'a> {
    tag: &'a str,
    attrs: Vec<(&'a str, &'a str)>,
}

impl<'a> Match<'a> {
    pub fn tag(tag: &'a str) -> Self {
        Match { tag, attrs: Vec::new() }
    }

    pub fn attr(mut self, key: &'a str, value: &'a str) -> Self {
        self.attrs.push((key, value));
        self
    }

    pub fn matches(&self, element: &Element) -> bool {
        element.name == self.tag
            && self
                .attrs
                .iter()
                .all(|(k, v)| element.attr(k) == Some(*v))
    }

    /// Path fragment used in error messages, e.g. `disk[@device='disk']`.
    pub fn describe(&self) -> String {
        let mut out = self.tag.to_string();
        for (k, v) in &self.attrs {
            out.push_str(&format!("[@{k}='{v}']"));
        }
        out
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Overwrites an existing attribute in place, or appends it.
    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Concatenated direct text content, `None` if the element has none.
    pub fn text(&self) -> Option<String> {
        let mut text = None::<String>;
        for child in &self.children {
            if let Node::Text(t) = child {
                text.get_or_insert_with(String::new).push_str(t);
            }
        }
        text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.retain(|c| !matches!(c, Node::Text(_)));
        self.children.insert(0, Node::Text(text.into()));
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|c| match c {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.elements().find(|e| e.name == tag)
    }

    pub fn child_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.name == tag)
    }

    pub fn matching<'s>(&'s self, m: &Match<'s>) -> impl Iterator<Item = &'s Element> + 's {
        let m = m.clone();
        self.elements().filter(move |e| m.matches(e))
    }

    pub fn matching_mut<'s>(
        &'s mut self,
        m: &Match<'s>,
    ) -> impl Iterator<Item = &'s mut Element> + 's {
        let m = m.clone();
        self.elements_mut().filter(move |e| m.matches(e))
    }

    pub fn append(&mut self, child: Element) -> &mut Element {
        self.children.push(Node::Element(child));
        match self.children.last_mut() {
            Some(Node::Element(e)) => e,
            _ => unreachable!("element was just pushed"),
        }
    }

    /// Returns the first child named `tag`, creating it (once) if absent.
    pub fn find_or_create(&mut self, tag: &str) -> &mut Element {
        let pos = self
            .children
            .iter()
            .position(|c| matches!(c, Node::Element(e) if e.name == tag));
        match pos {
            Some(i) => match &mut self.children[i] {
                Node::Element(e) => e,
                _ => unreachable!("position matched an element"),
            },
            None => self.append(Element::new(tag)),
        }
    }

    /// Drops every direct child element selected by `m`; returns how many went.
    pub fn remove_children(&mut self, m: &Match) -> usize {
        let before = self.children.len();
        self.children
            .retain(|c| !matches!(c, Node::Element(e) if m.matches(e)));
        before - self.children.len()
    }

    pub fn clear_elements(&mut self) {
        self.children.retain(|c| !matches!(c, Node::Element(_)));
    }

    /// Walks a `/`-separated path of child tags below this element.
    pub fn require(&mut self, path: &str) -> Result<&mut Element, AppError> {
        let mut current = self;
        for tag in path.split('/').filter(|t| !t.is_empty()) {
            current = current
                .child_mut(tag)
                .ok_or_else(|| AppError::missing(path))?;
        }
        Ok(current)
    }

    /// Non-blank, trimmed text of the child at `path`.
    pub fn require_text(&self, path: &str) -> Result<String, AppError> {
        let mut current = self;
        for tag in path.split('/').filter(|t| !t.is_empty()) {
            current = current.child(tag).ok_or_else(|| AppError::missing(path))?;
        }
        current
            .text()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::missing(path))
    }

    /// Prefix bound to `uri` by an `xmlns:*` attribute on this element.
    pub fn namespace_prefix(&self, uri: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, v)| k.starts_with("xmlns:") && v == uri)
            .map(|(k, _)| &k["xmlns:".len()..])
    }

    /// URI bound to `prefix` by an `xmlns:<prefix>` attribute on this element.
    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        self.attr(&format!("xmlns:{prefix}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    declaration: Option<String>,
    doctype: Option<String>,
    /// Comments and instructions before the root (libvirt writes a warning there).
    prolog: Vec<Node>,
    pub root: Element,
    epilog: Vec<Node>,
}

impl Document {
    pub fn parse(xml: &str) -> Result<Self, AppError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut declaration = None;
        let mut doctype = None;
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event()? {
                Event::Decl(ref e) => {
                    declaration = Some(String::from_utf8_lossy(e.as_ref()).to_string());
                }
                Event::Start(ref e) => {
                    stack.push(element_from_start(e)?);
                }
                Event::Empty(ref e) => {
                    let element = element_from_start(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| AppError::Xml("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(ref e) => {
                    let raw = String::from_utf8_lossy(e.as_ref());
                    // indentation only; real text is kept verbatim
                    if raw.trim().is_empty() {
                        continue;
                    }
                    let text = unescape(&raw)?.to_string();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::Text(text));
                    }
                }
                Event::CData(ref e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(e.as_ref()).to_string();
                        parent.children.push(Node::Text(text));
                    }
                }
                Event::Comment(ref e) => {
                    let comment = Node::Comment(String::from_utf8_lossy(e.as_ref()).to_string());
                    place_misc(&mut stack, &root, &mut prolog, &mut epilog, comment);
                }
                Event::PI(ref e) => {
                    let pi = Node::Instruction(String::from_utf8_lossy(e.as_ref()).to_string());
                    place_misc(&mut stack, &root, &mut prolog, &mut epilog, pi);
                }
                Event::DocType(ref e) => {
                    doctype = Some(String::from_utf8_lossy(e.as_ref()).to_string());
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(AppError::Xml(format!(
                "unclosed element <{}>",
                stack.last().map(|e| e.name.as_str()).unwrap_or_default()
            )));
        }
        let root = root.ok_or_else(|| AppError::Xml("document has no root element".to_string()))?;

        Ok(Document {
            declaration,
            doctype,
            prolog,
            root,
            epilog,
        })
    }

    pub fn to_xml_string(&self) -> Result<String, AppError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        if let Some(ref decl) = self.declaration {
            writer.write_event(Event::Decl(BytesDecl::from_start(BytesStart::from_content(
                decl.as_str(),
                3,
            ))))?;
        }
        if let Some(ref doctype) = self.doctype {
            writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
        }
        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }
        write_element(&mut writer, &self.root)?;
        for node in &self.epilog {
            write_node(&mut writer, node)?;
        }

        let mut xml = String::from_utf8(writer.into_inner())
            .map_err(|e| AppError::Xml(format!("serialized XML is not UTF-8: {e}")))?;
        xml.push('\n');
        Ok(xml)
    }

    /// Whitespace-only text between elements is not kept; the writer
    /// re-indents with two spaces.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }

    pub fn save(&self, path: &Path) -> Result<(), AppError> {
        std::fs::write(path, self.to_xml_string()?)?;
        Ok(())
    }

    /// Shorthand for `root.require`, with the root tag prefixed in errors.
    pub fn require(&mut self, path: &str) -> Result<&mut Element, AppError> {
        let root_name = self.root.name.clone();
        self.root.require(path).map_err(|_| AppError::missing(format!("{root_name}/{path}")))
    }

    pub fn require_text(&self, path: &str) -> Result<String, AppError> {
        self.root
            .require_text(path)
            .map_err(|_| AppError::missing(format!("{}/{path}", self.root.name)))
    }

    /// Qualified name for `local` in the namespace `uri`, declaring the
    /// namespace on the root as `default_prefix` when it is not yet bound.
    pub fn ensure_namespace(&mut self, default_prefix: &str, uri: &str) -> String {
        if let Some(prefix) = self.root.namespace_prefix(uri) {
            return prefix.to_string();
        }
        let mut prefix = default_prefix.to_string();
        let mut n = 1;
        while self.root.namespace_uri(&prefix).is_some() {
            prefix = format!("{default_prefix}{n}");
            n += 1;
        }
        self.root.set_attr(&format!("xmlns:{prefix}"), uri);
        prefix
    }
}

fn element_from_start(e: &BytesStart) -> Result<Element, AppError> {
    let mut element = Element::new(String::from_utf8_lossy(e.name().as_ref()).to_string());
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let raw = String::from_utf8_lossy(&attr.value);
        element.attributes.push((key, unescape(&raw)?.to_string()));
    }
    Ok(element)
}

fn place_misc(
    stack: &mut [Element],
    root: &Option<Element>,
    prolog: &mut Vec<Node>,
    epilog: &mut Vec<Node>,
    node: Node,
) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_none() => prolog.push(node),
        None => epilog.push(node),
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), AppError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => {
            return Err(AppError::Xml(format!(
                "second root element <{}>",
                element.name
            )))
        }
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), AppError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (k, v) in &element.attributes {
        start.push_attribute((k.as_str(), v.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), AppError> {
    match node {
        Node::Element(e) => write_element(writer, e)?,
        Node::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
        Node::Comment(c) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?
        }
        Node::Instruction(pi) => writer.write_event(Event::PI(BytesPI::new(pi.as_str())))?,
    }
    Ok(())
}
