//! XML to JSON conversion for markup bodies.
//!
//! The document becomes an object with the root element name as its only key.
//! Within an element:
//! - attributes are stored under `"@name"`
//! - child elements are stored under their name, repeated names become arrays
//! - an element with only text becomes a string
//! - text next to attributes or children is stored under `"#text"`

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use super::BodyError;

const TEXT_KEY: &str = "#text";

struct Element {
    name: String,
    fields: Map<String, Value>,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, BodyError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut fields = Map::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| BodyError::Xml(e.to_string()))?;
            let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = attr
                .unescape_value()
                .map_err(|e| BodyError::Xml(e.to_string()))?;
            fields.insert(key, Value::String(value.into_owned()));
        }

        Ok(Self {
            name,
            fields,
            text: String::new(),
        })
    }

    fn add_child(&mut self, name: String, value: Value) {
        match self.fields.get_mut(&name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                self.fields.insert(name, value);
            }
        }
    }

    fn close(self) -> (String, Value) {
        if self.fields.is_empty() {
            return (self.name, Value::String(self.text));
        }

        let mut fields = self.fields;
        if !self.text.is_empty() {
            fields.insert(TEXT_KEY.to_string(), Value::String(self.text));
        }
        (self.name, Value::Object(fields))
    }
}

/// Convert an XML document to a JSON value.
pub fn to_json(text: &str) -> Result<Value, BodyError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| BodyError::Xml(e.to_string()))?;

        match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(BodyError::Xml("multiple root elements".to_string()));
                }
                stack.push(Element::open(&start)?);
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(BodyError::Xml("multiple root elements".to_string()));
                }
                let element = Element::open(&start)?;
                finish(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| BodyError::Xml("unexpected closing tag".to_string()))?;
                finish(element, &mut stack, &mut root);
            }
            Event::Text(t) => {
                let content = t.unescape().map_err(|e| BodyError::Xml(e.to_string()))?;
                match stack.last_mut() {
                    Some(element) => element.text.push_str(&content),
                    None if content.trim().is_empty() => {}
                    None => return Err(BodyError::Xml("text outside root element".to_string())),
                }
            }
            Event::CData(data) => {
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(BodyError::Xml("unexpected end of document".to_string()));
    }

    root.ok_or_else(|| BodyError::Xml("document has no root element".to_string()))
}

fn finish(element: Element, stack: &mut Vec<Element>, root: &mut Option<Value>) {
    let (name, value) = element.close();
    match stack.last_mut() {
        Some(parent) => parent.add_child(name, value),
        None => {
            let mut object = Map::new();
            object.insert(name, value);
            *root = Some(Value::Object(object));
        }
    }
}
