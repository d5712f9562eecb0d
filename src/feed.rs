use std::fs;
use std::io;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use tracing::info;

use crate::models::Table;

/// Written in place of an empty cell.
const MISSING: &str = "nan";

/// Renders the table as an indented product feed.
///
/// The document is `<root>` holding one `<description>` and then one `<row>`
/// element per record, each with a child per column in column order. Only
/// `&`, `<` and `>` are escaped, so `product_type`'s pre-encoded `&gt;`
/// separator comes out as `&amp;gt;`.
pub fn to_feed(
    table: &Table,
    root: &str,
    row: &str,
    description: &str,
) -> Result<Vec<u8>, quick_xml::Error> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Start(BytesStart::new(root)))?;
    write_text_element(&mut writer, "description", description)?;

    for record in table.rows() {
        writer.write_event(Event::Start(BytesStart::new(row)))?;
        for (column, value) in record.fields() {
            let value = if value.is_empty() { MISSING } else { value };
            write_text_element(&mut writer, column, value)?;
        }
        writer.write_event(Event::End(BytesEnd::new(row)))?;
    }

    writer.write_event(Event::End(BytesEnd::new(root)))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

pub fn write_feed(feed: &[u8], path: &Path) -> io::Result<()> {
    fs::write(path, feed)?;
    info!(bytes = feed.len(), path = %path.display(), "feed written");
    Ok(())
}
