//! XML program format: instruction records ↔ XML documents.
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <program language="IPPcode18">
//!   <instruction order="1" opcode="WRITE">
//!     <arg1 type="string">Hello,\032world!</arg1>
//!   </instruction>
//! </program>
//! ```
//!
//! Reading only checks the document shape. Order numbering, the `argN`
//! sequence and literal syntax are left to the verifier.

use crate::error::XmlError;
use ipp_common::{ArgRecord, ArgTag, InstructionRecord};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;

/// Value of the `language` attribute on `<program>`.
pub const LANGUAGE: &str = "IPPcode18";

/// Attributes `<program>` may carry besides `language`.
const PROGRAM_EXTRAS: [&str; 2] = ["name", "description"];

/// Render records as an XML document, arguments in `argN` order.
pub fn to_xml(records: &[InstructionRecord]) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    let mut program = BytesStart::new("program");
    program.push_attribute(("language", LANGUAGE));
    emit(&mut writer, Event::Start(program))?;

    for record in records {
        let order = record.order.to_string();
        let mut instruction = BytesStart::new("instruction");
        instruction.push_attribute(("order", order.as_str()));
        instruction.push_attribute(("opcode", record.opcode.as_str()));

        if record.args.is_empty() {
            emit(&mut writer, Event::Empty(instruction))?;
            continue;
        }
        emit(&mut writer, Event::Start(instruction))?;

        let mut args: Vec<&ArgRecord> = record.args.iter().collect();
        args.sort_by_key(|arg| arg.position);
        for arg in args {
            let name = format!("arg{}", arg.position);
            let mut element = BytesStart::new(name.as_str());
            element.push_attribute(("type", arg.tag.name()));
            if arg.text.is_empty() {
                emit(&mut writer, Event::Empty(element))?;
            } else {
                emit(&mut writer, Event::Start(element))?;
                emit(&mut writer, Event::Text(BytesText::new(&arg.text)))?;
                emit(&mut writer, Event::End(BytesEnd::new(name.as_str())))?;
            }
        }
        emit(&mut writer, Event::End(BytesEnd::new("instruction")))?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("program")))?;

    let mut text = String::from_utf8(writer.into_inner())
        .map_err(|e| XmlError::Render(e.to_string()))?;
    text.push('\n');
    Ok(text)
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Render(e.to_string()))
}

/// Read an XML document into instruction records, in document order.
pub fn from_xml(text: &str) -> Result<Vec<InstructionRecord>, XmlError> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);
    let mut builder = Builder::default();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError::Malformed(e.to_string()))?;
        match event {
            Event::Start(element) => builder.open(&element, false)?,
            Event::Empty(element) => builder.open(&element, true)?,
            Event::End(_) => builder.close(),
            Event::Text(data) => {
                let data = data
                    .unescape()
                    .map_err(|e| XmlError::Malformed(e.to_string()))?;
                builder.text(&data)?;
            }
            Event::CData(data) => {
                let raw = data.into_inner();
                let data = std::str::from_utf8(&raw)
                    .map_err(|e| XmlError::Malformed(e.to_string()))?;
                builder.text(data)?;
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    builder.finish()
}

/// Where the reader currently is in the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Depth {
    #[default]
    Document,
    Program,
    Instruction,
    Argument,
    Done,
}

#[derive(Default)]
struct Builder {
    depth: Depth,
    records: Vec<InstructionRecord>,
    instruction: Option<InstructionRecord>,
    arg: Option<ArgRecord>,
}

impl Builder {
    fn open(&mut self, element: &BytesStart<'_>, empty: bool) -> Result<(), XmlError> {
        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        let attrs = attributes(element, &name)?;

        match self.depth {
            Depth::Document => {
                if name != "program" {
                    return Err(XmlError::UnexpectedElement {
                        expected: "<program>",
                        found: name,
                    });
                }
                program_attributes(&name, &attrs)?;
                self.depth = if empty { Depth::Done } else { Depth::Program };
            }
            Depth::Program => {
                if name != "instruction" {
                    return Err(XmlError::UnexpectedElement {
                        expected: "<instruction>",
                        found: name,
                    });
                }
                let order = required(&name, &attrs, "order")?;
                let order = order
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| invalid(&name, "order", order))?;
                let opcode = required(&name, &attrs, "opcode")?;
                if let Some((key, value)) = attrs
                    .iter()
                    .find(|(key, _)| key != "order" && key != "opcode")
                {
                    return Err(invalid(&name, key, value));
                }
                let record = InstructionRecord::new(order, opcode, Vec::new());
                if empty {
                    self.records.push(record);
                } else {
                    self.instruction = Some(record);
                    self.depth = Depth::Instruction;
                }
            }
            Depth::Instruction => {
                let position = name
                    .strip_prefix("arg")
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(|| XmlError::UnexpectedElement {
                        expected: "<argN>",
                        found: name.clone(),
                    })?;
                let tag = required(&name, &attrs, "type")?;
                let tag = tag
                    .parse::<ArgTag>()
                    .map_err(|_| invalid(&name, "type", tag))?;
                if let Some((key, value)) = attrs.iter().find(|(key, _)| key != "type") {
                    return Err(invalid(&name, key, value));
                }
                let arg = ArgRecord::new(position, tag, "");
                if empty {
                    self.push_arg(arg);
                } else {
                    self.arg = Some(arg);
                    self.depth = Depth::Argument;
                }
            }
            Depth::Argument => {
                return Err(XmlError::UnexpectedElement {
                    expected: "argument text",
                    found: name,
                })
            }
            Depth::Done => {
                return Err(XmlError::UnexpectedElement {
                    expected: "end of document",
                    found: name,
                })
            }
        }
        Ok(())
    }

    /// End tags are matched by the reader, so only the depth changes here.
    fn close(&mut self) {
        self.depth = match self.depth {
            Depth::Argument => {
                if let Some(arg) = self.arg.take() {
                    self.push_arg(arg);
                }
                Depth::Instruction
            }
            Depth::Instruction => {
                if let Some(record) = self.instruction.take() {
                    self.records.push(record);
                }
                Depth::Program
            }
            Depth::Program | Depth::Document | Depth::Done => Depth::Done,
        };
    }

    fn text(&mut self, data: &str) -> Result<(), XmlError> {
        match (self.depth, self.arg.as_mut()) {
            (Depth::Argument, Some(arg)) => {
                arg.text.push_str(data);
                Ok(())
            }
            _ => Err(XmlError::UnexpectedText(data.to_string())),
        }
    }

    fn push_arg(&mut self, arg: ArgRecord) {
        if let Some(record) = self.instruction.as_mut() {
            record.args.push(arg);
        }
    }

    fn finish(self) -> Result<Vec<InstructionRecord>, XmlError> {
        match self.depth {
            Depth::Done => Ok(self.records),
            Depth::Document => Err(XmlError::MissingProgram),
            _ => Err(XmlError::Malformed("unexpected end of document".to_string())),
        }
    }
}

/// Decoded `(name, value)` attribute pairs of `element`.
fn attributes(element: &BytesStart<'_>, name: &str) -> Result<Vec<(String, String)>, XmlError> {
    element
        .attributes()
        .map(|attr| -> Result<(String, String), XmlError> {
            let attr = attr.map_err(|e| XmlError::Malformed(format!("<{name}>: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value: Cow<'_, str> = attr
                .unescape_value()
                .map_err(|e| XmlError::Malformed(format!("<{name}>: {e}")))?;
            Ok((key, value.into_owned()))
        })
        .collect()
}

fn program_attributes(name: &str, attrs: &[(String, String)]) -> Result<(), XmlError> {
    let language = required(name, attrs, "language")?;
    if language != LANGUAGE {
        return Err(invalid(name, "language", language));
    }
    match attrs
        .iter()
        .find(|(key, _)| key != "language" && !PROGRAM_EXTRAS.contains(&key.as_str()))
    {
        Some((key, value)) => Err(invalid(name, key, value)),
        None => Ok(()),
    }
}

fn required<'a>(
    element: &str,
    attrs: &'a [(String, String)],
    key: &'static str,
) -> Result<&'a str, XmlError> {
    attrs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
        .ok_or_else(|| XmlError::MissingAttribute {
            element: element.to_string(),
            name: key,
        })
}

fn invalid(element: &str, name: &str, value: &str) -> XmlError {
    XmlError::InvalidAttribute {
        element: element.to_string(),
        name: name.to_string(),
        value: value.to_string(),
    }
}
