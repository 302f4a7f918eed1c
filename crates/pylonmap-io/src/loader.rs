//! XML document loader.
//!
//! Streams the export with quick-xml and materializes only the subtrees rooted
//! at elements whose local name equals the requested object tag. Everything
//! outside those subtrees is skipped without allocation. Nested object-tag
//! elements inside an already open object become ordinary children.

use std::fs;
use std::path::Path;

use pylonmap_core::{PylonmapError, PylonmapResult, TaggedObject};
use quick_xml::{events::Event, name::LocalName, Reader};
use tracing::debug;

/// Parse every `object_tag` element of an XML document held in memory.
///
/// A document that is not well formed is a [`PylonmapError::Parse`]. A well
/// formed document without matching elements yields an empty list.
pub fn parse_objects(text: &str, object_tag: &str) -> PylonmapResult<Vec<TaggedObject>> {
    let mut reader = Reader::from_str(text.trim_start_matches('\u{feff}'));
    reader.trim_text(true);

    let mut objects = Vec::new();
    // Open elements of the object currently being materialized.
    let mut stack: Vec<TaggedObject> = Vec::new();
    let mut depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                depth += 1;
                let name = e.local_name();
                let tag = local_name_as_str(&name);
                if !stack.is_empty() || tag == object_tag {
                    stack.push(TaggedObject::new(tag));
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                let tag = local_name_as_str(&name);
                match stack.last_mut() {
                    Some(parent) => parent.children.push(TaggedObject::new(tag)),
                    None if tag == object_tag => objects.push(TaggedObject::new(tag)),
                    None => {}
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| parse_error(&reader, err))?;
                    append_text(current, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(current) = stack.last_mut() {
                    append_text(current, &String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if let Some(done) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(done),
                        None => objects.push(done),
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(parse_error(&reader, err)),
            _ => {}
        }
    }

    if depth > 0 {
        return Err(PylonmapError::Parse(format!(
            "unexpected end of document with {depth} unclosed element(s)"
        )));
    }

    debug!(tag = object_tag, objects = objects.len(), "parsed XML objects");
    Ok(objects)
}

/// Read and parse a document from disk.
pub fn load_objects(path: &Path, object_tag: &str) -> PylonmapResult<Vec<TaggedObject>> {
    let text = fs::read_to_string(path)?;
    parse_objects(&text, object_tag)
        .map_err(|err| PylonmapError::Parse(format!("{}: {}", path.display(), err)))
}

fn append_text(node: &mut TaggedObject, chunk: &str) {
    let merged = match node.text.take() {
        Some(mut text) => {
            text.push_str(chunk);
            text
        }
        None => chunk.to_string(),
    };
    node.set_text(merged);
}

fn parse_error(reader: &Reader<&[u8]>, err: quick_xml::Error) -> PylonmapError {
    PylonmapError::Parse(format!("at byte {}: {}", reader.buffer_position(), err))
}

fn local_name_as_str<'a>(name: &'a LocalName<'a>) -> &'a str {
    std::str::from_utf8(name.as_ref()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAG: &str = "CatalogObject.урскСтруктураСети";

    #[test]
    fn test_parses_objects_at_any_depth() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<V8Exch:_1CV8DtUD xmlns:V8Exch="http://www.1c.ru/V8/1CV8DtUD/">
  <V8Exch:Data>
    <CatalogObject.урскСтруктураСети>
      <Ref>A</Ref>
      <Description>Опора &amp; 1</Description>
      <Parent/>
    </CatalogObject.урскСтруктураСети>
    <Wrapper>
      <CatalogObject.урскСтруктураСети><Ref>B</Ref></CatalogObject.урскСтруктураСети>
    </Wrapper>
    <CatalogObject.Other><Ref>X</Ref></CatalogObject.Other>
  </V8Exch:Data>
</V8Exch:_1CV8DtUD>"#;

        let objects = parse_objects(xml, TAG).unwrap();
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0].field("Ref"), Some("A"));
        assert_eq!(objects[0].field("Description"), Some("Опора & 1"));
        assert!(objects[0].child("Parent").is_some());
        assert_eq!(objects[0].field("Parent"), None);
        assert_eq!(objects[1].field("Ref"), Some("B"));
    }

    #[test]
    fn test_nested_rows_preserved() {
        let xml = format!(
            "<root><{TAG}><Ref>A</Ref><СтатическиеХарактеристики>\
             <Row><Характеристика>lat</Характеристика><Значение>55.1N</Значение></Row>\
             <Row><Характеристика>lon</Характеристика><Значение> 37.1E </Значение></Row>\
             </СтатическиеХарактеристики></{TAG}></root>"
        );
        let objects = parse_objects(&xml, TAG).unwrap();
        let table = objects[0].child("СтатическиеХарактеристики").unwrap();
        let rows: Vec<_> = table.children_named("Row").collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].field("Значение"), Some("37.1E"));
    }

    #[test]
    fn test_document_without_objects_is_empty() {
        assert!(parse_objects("<root/>", TAG).unwrap().is_empty());
        assert!(parse_objects("<root><Other/></root>", TAG).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        let err = parse_objects("<root><a></b></root>", TAG).unwrap_err();
        assert!(matches!(err, PylonmapError::Parse(_)));

        let truncated = format!("<root><{TAG}><Ref>A</Ref>");
        let err = parse_objects(&truncated, TAG).unwrap_err();
        assert!(matches!(err, PylonmapError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_objects(Path::new("/nonexistent/pylonmap/input.xml"), TAG).unwrap_err();
        assert!(matches!(err, PylonmapError::Io(_)));
    }
}
