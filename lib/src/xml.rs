use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::tree::{Content, Node};

struct Frame {
    tag: String,
    attrs: IndexMap<String, String>,
    children: IndexMap<String, Vec<Node>>,
    text: String,
}

impl Frame {
    fn new(element: &BytesStart) -> Result<Self> {
        let tag = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        let mut attrs = IndexMap::new();
        for attr in element.attributes() {
            let attr = attr.context("malformed attribute")?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .context("malformed attribute value")?
                .into_owned();
            attrs.insert(key, value);
        }

        Ok(Self {
            tag,
            attrs,
            children: IndexMap::new(),
            text: String::new(),
        })
    }

    fn into_node(self) -> (String, Node) {
        // Elements with child elements drop interleaved whitespace text.
        let content = if self.children.is_empty() {
            Content::Text(self.text)
        } else {
            Content::Children(self.children)
        };

        (
            self.tag,
            Node {
                attrs: self.attrs,
                content,
            },
        )
    }

    fn attach(&mut self, tag: String, node: Node) {
        self.children.entry(tag).or_default().push(node);
    }
}

pub fn parse_document(xml: &str) -> Result<Node> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Frame> = Vec::new();
    let mut root = Frame {
        tag: String::new(),
        attrs: IndexMap::new(),
        children: IndexMap::new(),
        text: String::new(),
    };

    loop {
        match reader.read_event().context("malformed XML document")? {
            Event::Start(element) => stack.push(Frame::new(&element)?),
            Event::Empty(element) => {
                let (tag, node) = Frame::new(&element)?.into_node();
                stack.last_mut().unwrap_or(&mut root).attach(tag, node);
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&text.unescape().context("malformed character data")?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::End(_) => {
                let frame = match stack.pop() {
                    Some(frame) => frame,
                    None => bail!("unexpected closing tag"),
                };
                let (tag, node) = frame.into_node();
                stack.last_mut().unwrap_or(&mut root).attach(tag, node);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        bail!("unexpected end of document");
    }
    if root.children.is_empty() {
        bail!("document has no root element");
    }

    Ok(root.into_node().1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn parses_nested_elements_into_tree() {
        let document = parse_document(
            "<a one=\"1\"><b>first</b><c/><b>second</b></a>",
        )
        .unwrap();

        assert_eq!(document.text_at(path!["#", "a", 0, "@", "one"]), "1");
        let items = document.nodes_at(path!["#", "a", 0, "#", "b"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].text_at(path!["#"]), "first");
        assert_eq!(items[1].text_at(path!["#"]), "second");
        assert_eq!(document.text_at(path!["#", "a", 0, "#", "c", 0, "#"]), "");
    }

    #[test]
    fn decodes_entities_and_cdata() {
        let document =
            parse_document("<a><b>x &amp; y</b><c><![CDATA[<p>kept</p>]]></c></a>").unwrap();

        assert_eq!(document.text_at(path!["#", "a", 0, "#", "b", 0, "#"]), "x & y");
        assert_eq!(
            document.text_at(path!["#", "a", 0, "#", "c", 0, "#"]),
            "<p>kept</p>"
        );
    }

    #[test]
    fn rejects_malformed_documents() {
        assert!(parse_document("<a><b></a>").is_err());
        assert!(parse_document("no markup at all").is_err());
    }
}
