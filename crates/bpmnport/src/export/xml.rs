//! Small helpers over the quick-xml writer.

use std::io::Cursor;

use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};

use super::Error;

pub(crate) type XmlWriter = Cursor<Vec<u8>>;

pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Optional attributes are dropped when `None`.
pub(crate) type Attrs<'a> = [(&'a str, Option<&'a str>)];

fn start_tag<'a>(tag_name: &'a str, attrs: &Attrs<'_>) -> BytesStart<'a> {
    let mut elem = BytesStart::new(tag_name);
    for (key, value) in attrs {
        if let Some(value) = value {
            elem.push_attribute((*key, *value));
        }
    }
    elem
}

pub(crate) fn write_tag_start_with_attrs(
    writer: &mut Writer<XmlWriter>,
    tag_name: &str,
    attrs: &[(&str, &str)],
) -> Result<()> {
    let mut elem = BytesStart::new(tag_name);
    for attr in attrs.iter() {
        elem.push_attribute(*attr);
    }
    writer.write_event(Event::Start(elem)).map_err(Error::Xml)
}

pub(crate) fn write_tag_start_with_opt_attrs(
    writer: &mut Writer<XmlWriter>,
    tag_name: &str,
    attrs: &Attrs<'_>,
) -> Result<()> {
    writer
        .write_event(Event::Start(start_tag(tag_name, attrs)))
        .map_err(Error::Xml)
}

pub(crate) fn write_empty_tag(
    writer: &mut Writer<XmlWriter>,
    tag_name: &str,
    attrs: &Attrs<'_>,
) -> Result<()> {
    writer
        .write_event(Event::Empty(start_tag(tag_name, attrs)))
        .map_err(Error::Xml)
}

pub(crate) fn write_tag_end(writer: &mut Writer<XmlWriter>, tag_name: &str) -> Result<()> {
    writer
        .write_event(Event::End(BytesEnd::new(tag_name)))
        .map_err(Error::Xml)
}

pub(crate) fn write_tag_text(writer: &mut Writer<XmlWriter>, content: &str) -> Result<()> {
    writer
        .write_event(Event::Text(BytesText::new(content)))
        .map_err(Error::Xml)
}

pub(crate) fn write_tag(writer: &mut Writer<XmlWriter>, tag_name: &str, content: &str) -> Result<()> {
    write_tag_with_attrs(writer, tag_name, content, &[])
}

/// Writes `<tag attrs>content</tag>` on one line, even when `content` is
/// empty.
pub(crate) fn write_tag_with_attrs(
    writer: &mut Writer<XmlWriter>,
    tag_name: &str,
    content: &str,
    attrs: &[(&str, &str)],
) -> Result<()> {
    write_tag_start_with_attrs(writer, tag_name, attrs)?;

    write_tag_text(writer, content)?;

    write_tag_end(writer, tag_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(write: impl FnOnce(&mut Writer<XmlWriter>) -> Result<()>) -> String {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        write(&mut writer).unwrap();
        String::from_utf8(writer.into_inner().into_inner()).unwrap()
    }

    #[test]
    fn test_optional_attributes_are_skipped() {
        let xml = render(|w| write_empty_tag(w, "task", &[("id", Some("t1")), ("name", None)]));

        assert_eq!(xml, r#"<task id="t1"/>"#);
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = render(|w| write_tag(w, "text", "a < b & c"));

        assert_eq!(xml, "<text>a &lt; b &amp; c</text>");
    }

    #[test]
    fn test_attribute_is_escaped() {
        let xml = render(|w| write_empty_tag(w, "task", &[("name", Some("say \"hi\""))]));

        assert_eq!(xml, r#"<task name="say &quot;hi&quot;"/>"#);
    }
}
