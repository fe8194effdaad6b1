use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

use super::FeedError;

/// Maximum allowed element nesting depth.
/// Keeps the recursive tree walks bounded on hostile input.
const MAX_XML_DEPTH: usize = 256;

/// A parsed XML element with just enough structure for RSS lookups.
///
/// `text` holds the character data that appears before the first child
/// element (text, CDATA and resolved references, untrimmed). Attributes are
/// not kept since nothing in an RSS 2.0 channel needs them here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    fn new(name: String) -> Self {
        Self {
            name,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Qualified tag name, prefix included (`dc:creator`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// First direct child named `name`.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// All direct children named `name`, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Direct-child text lookup: text of the first child named `name`,
    /// or `""` when the child is missing or has no text.
    pub fn find_text(&self, name: &str) -> &str {
        self.find(name).map(XmlElement::text).unwrap_or("")
    }

    /// Takes the first descendant named `name` in document order.
    /// The element itself is never a candidate.
    fn take_descendant(self, name: &str) -> Option<XmlElement> {
        for child in self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.take_descendant(name) {
                return Some(found);
            }
        }
        None
    }
}

/// Parses `xml` and returns its `channel` element.
///
/// # Errors
///
/// - [`FeedError::MalformedInput`] if the text is not well-formed XML
/// - [`FeedError::MissingChannel`] if the document (possibly empty) has no
///   `channel` element below its root
pub fn parse_channel(xml: &str) -> Result<XmlElement, FeedError> {
    let root = parse_document(xml)?;
    let channel = root
        .and_then(|root| root.take_descendant("channel"))
        .ok_or(FeedError::MissingChannel)?;

    tracing::trace!(children = channel.children.len(), "Located channel element");
    Ok(channel)
}

/// Builds the element tree for `xml`. Returns `Ok(None)` when the input
/// holds no element at all (empty or only whitespace, comments, declarations).
///
/// Unknown entity references are rejected rather than passed through: only
/// the five XML builtins and numeric character references are resolved.
/// Start tags must have well-formed, unique attributes and every namespace
/// prefix they use must be declared.
pub fn parse_document(xml: &str) -> Result<Option<XmlElement>, FeedError> {
    let mut reader = NsReader::from_str(xml);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let (namespace, event) = reader
            .read_resolved_event()
            .map_err(|e| FeedError::MalformedInput(e.to_string()))?;
        let unbound_prefix = match namespace {
            ResolveResult::Unknown(prefix) => Some(String::from_utf8_lossy(&prefix).into_owned()),
            _ => None,
        };

        match event {
            Event::Start(e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(junk_after_root());
                }
                if stack.len() >= MAX_XML_DEPTH {
                    return Err(FeedError::MalformedInput(format!(
                        "element nesting depth exceeds maximum of {} levels",
                        MAX_XML_DEPTH
                    )));
                }
                let name = checked_tag_name(&e, unbound_prefix, &reader)?;
                stack.push(XmlElement::new(name));
            }
            Event::Empty(e) => {
                let name = checked_tag_name(&e, unbound_prefix, &reader)?;
                close_element(XmlElement::new(name), &mut stack, &mut root)?;
            }
            Event::End(e) => {
                let element = stack.pop().ok_or_else(|| {
                    FeedError::MalformedInput(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                close_element(element, &mut stack, &mut root)?;
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| FeedError::MalformedInput(err.to_string()))?;
                push_text(&text, &mut stack)?;
            }
            Event::CData(e) => {
                let bytes = e.into_inner();
                push_text(&String::from_utf8_lossy(&bytes), &mut stack)?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and DOCTYPE carry no feed data
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(FeedError::MalformedInput(format!(
            "unclosed element <{}> at end of input",
            open.name
        )));
    }

    Ok(root)
}

/// Validates a start tag and returns its qualified name.
///
/// Attributes are only checked, never stored: a bare `foo`, an unquoted
/// `a=1` or a repeated name fails, as does an undeclared prefix on the tag
/// or on an attribute. `xml:` and `xmlns` declarations are always bound.
fn checked_tag_name(
    e: &BytesStart<'_>,
    unbound_prefix: Option<String>,
    reader: &NsReader<&[u8]>,
) -> Result<String, FeedError> {
    if let Some(prefix) = unbound_prefix {
        return Err(unbound_prefix_error(&prefix));
    }

    let mut attributes = e.attributes();
    attributes.with_checks(true);
    for attr in attributes {
        let attr = attr.map_err(|err| FeedError::MalformedInput(err.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        if attr.key.prefix().is_some_and(|p| p.as_ref() == b"xml") {
            continue;
        }
        if let (ResolveResult::Unknown(prefix), _) = reader.resolve_attribute(attr.key) {
            return Err(unbound_prefix_error(&String::from_utf8_lossy(&prefix)));
        }
    }

    Ok(String::from_utf8_lossy(e.name().as_ref()).into_owned())
}

fn unbound_prefix_error(prefix: &str) -> FeedError {
    FeedError::MalformedInput(format!("unbound namespace prefix '{}'", prefix))
}

fn close_element(
    element: XmlElement,
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
) -> Result<(), FeedError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(junk_after_root()),
    }
    Ok(())
}

fn push_text(text: &str, stack: &mut [XmlElement]) -> Result<(), FeedError> {
    match stack.last_mut() {
        // Only text before the first child counts as the element's own text
        Some(current) if current.children.is_empty() => current.text.push_str(text),
        Some(_) => {}
        None if text.trim().is_empty() => {}
        None => {
            return Err(FeedError::MalformedInput(
                "text outside of the root element".to_string(),
            ))
        }
    }
    Ok(())
}

fn junk_after_root() -> FeedError {
    FeedError::MalformedInput("junk after document element".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_channel_minimal() {
        let channel = parse_channel(
            "<rss><channel><title>T</title><link>http://x</link></channel></rss>",
        )
        .expect("minimal feed should parse");

        assert_eq!(channel.name(), "channel");
        assert_eq!(channel.find_text("title"), "T");
        assert_eq!(channel.find_text("link"), "http://x");
        assert_eq!(channel.find_text("language"), "");
    }

    #[test]
    fn test_find_text_first_match_wins() {
        let channel =
            parse_channel("<rss><channel><category>a</category><category>b</category></channel></rss>")
                .unwrap();
        assert_eq!(channel.find_text("category"), "a");
        let all: Vec<&str> = channel.find_all("category").map(XmlElement::text).collect();
        assert_eq!(all, vec!["a", "b"]);
    }

    #[test]
    fn test_text_is_not_trimmed() {
        let channel = parse_channel("<rss><channel><title>  spaced  </title></channel></rss>").unwrap();
        assert_eq!(channel.find_text("title"), "  spaced  ");
    }

    #[test]
    fn test_text_stops_at_first_child() {
        let channel =
            parse_channel("<rss><channel><title>Head<b>bold</b>tail</title></channel></rss>").unwrap();
        assert_eq!(channel.find_text("title"), "Head");
    }

    #[test]
    fn test_entities_and_cdata_resolved() {
        let xml = "<rss><channel>\
            <title>Tom &amp; Jerry &#169; &#x41;</title>\
            <description><![CDATA[<p>raw & html</p>]]></description>\
            </channel></rss>";
        let channel = parse_channel(xml).unwrap();
        assert_eq!(channel.find_text("title"), "Tom & Jerry \u{a9} A");
        assert_eq!(channel.find_text("description"), "<p>raw & html</p>");
    }

    #[test]
    fn test_self_closing_element_has_empty_text() {
        let channel = parse_channel("<rss><channel><language/></channel></rss>").unwrap();
        assert!(channel.find("language").is_some());
        assert_eq!(channel.find_text("language"), "");
    }

    #[test]
    fn test_channel_found_below_direct_children() {
        let channel =
            parse_channel("<feed><wrapper><channel><title>Deep</title></channel></wrapper></feed>")
                .unwrap();
        assert_eq!(channel.find_text("title"), "Deep");
    }

    #[test]
    fn test_root_is_never_the_channel() {
        let err = parse_channel("<channel><title>T</title></channel>").unwrap_err();
        assert!(matches!(err, FeedError::MissingChannel));
    }

    #[test]
    fn test_missing_channel() {
        for xml in ["<rss></rss>", "<rss/>", "", "   \n", "<?xml version=\"1.0\"?><!-- nothing -->"] {
            let err = parse_channel(xml).unwrap_err();
            assert!(matches!(err, FeedError::MissingChannel), "input {:?} gave {:?}", xml, err);
        }
    }

    #[test]
    fn test_unclosed_tags_are_malformed() {
        let err = parse_channel("<rss><channel>").unwrap_err();
        assert!(matches!(err, FeedError::MalformedInput(_)));
    }

    #[test]
    fn test_mismatched_end_tag_is_malformed() {
        let err = parse_channel("<rss><channel></rss></channel>").unwrap_err();
        assert!(matches!(err, FeedError::MalformedInput(_)));
    }

    #[test]
    fn test_unknown_entity_is_malformed() {
        let err = parse_channel("<rss><channel><title>a&nbsp;b</title></channel></rss>").unwrap_err();
        assert!(matches!(err, FeedError::MalformedInput(_)));
    }

    #[test]
    fn test_second_root_is_malformed() {
        let err = parse_channel("<rss><channel/></rss><rss/>").unwrap_err();
        assert!(matches!(err, FeedError::MalformedInput(_)));
    }

    #[test]
    fn test_text_outside_root_is_malformed() {
        let err = parse_channel("garbage <rss><channel/></rss>").unwrap_err();
        assert!(matches!(err, FeedError::MalformedInput(_)));
    }

    #[test]
    fn test_excessive_depth_rejected() {
        let depth = MAX_XML_DEPTH + 1;
        let xml = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        let err = parse_document(&xml).unwrap_err();
        match err {
            FeedError::MalformedInput(msg) => assert!(msg.contains("nesting depth")),
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_attributes_rejected() {
        for xml in [
            "<rss><channel foo></channel></rss>",
            "<rss><channel a=1></channel></rss>",
            r#"<rss><channel a="1" a="2"></channel></rss>"#,
            r#"<rss><channel><item x="1" x="1"/></channel></rss>"#,
        ] {
            match parse_channel(xml) {
                Err(FeedError::MalformedInput(_)) => {}
                other => panic!("Expected MalformedInput for {:?}, got {:?}", xml, other),
            }
        }
    }

    #[test]
    fn test_unbound_prefix_rejected() {
        for xml in [
            "<rss><channel><dc:creator>x</dc:creator></channel></rss>",
            r#"<rss><channel><title media:type="x">T</title></channel></rss>"#,
        ] {
            match parse_channel(xml) {
                Err(FeedError::MalformedInput(msg)) => assert!(msg.contains("unbound"), "{}", msg),
                other => panic!("Expected MalformedInput for {:?}, got {:?}", xml, other),
            }
        }
    }

    #[test]
    fn test_declared_namespaces_and_attributes_accepted() {
        let xml = r#"<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
            <channel xml:lang="en">
                <title type='text'>T</title>
                <dc:creator>Jane</dc:creator>
                <atom:link xmlns:atom="http://www.w3.org/2005/Atom" atom:rel="self" href="http://x"/>
            </channel></rss>"#;
        let channel = parse_channel(xml).unwrap();
        assert_eq!(channel.find_text("title"), "T");
        assert_eq!(channel.find_text("dc:creator"), "Jane");
        assert_eq!(channel.find_text("author"), "");
    }

    #[test]
    fn test_declaration_and_whitespace_are_ignored() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\">\n  <channel>\n    <title>T</title>\n  </channel>\n</rss>\n";
        let channel = parse_channel(xml).unwrap();
        assert_eq!(channel.find_text("title"), "T");
    }
}
