use std::sync::OnceLock;

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use regex::Regex;
use scraper::node::{Doctype, Element, Text};
use scraper::{ElementRef, Html, Node, Selector};

use crate::errors::{PostError, PostResult};

/// What the target element's content is replaced with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Link { href: String, text: String },
}

impl Content {
    /// The text a reader sees once the content is rendered
    pub fn text(&self) -> &str {
        match self {
            Content::Text(text) => text,
            Content::Link { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementUpdate {
    pub marker_class: String,
    pub presentation_class: String,
    pub content: Content,
}

impl ElementUpdate {
    pub fn new(
        marker_class: impl Into<String>,
        presentation_class: impl Into<String>,
        content: Content,
    ) -> Self {
        Self {
            marker_class: marker_class.into(),
            presentation_class: presentation_class.into(),
            content,
        }
    }
}

/// A marked element's classes and text content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementView {
    pub classes: Vec<String>,
    pub text: String,
}

impl ElementView {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// A parsed HTML page whose marked elements can be rewritten in place
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    /// Check a class name can be used as a selector or attribute value
    pub fn validate_class(class: &str) -> PostResult<()> {
        static CLASS_NAME: OnceLock<Regex> = OnceLock::new();
        let pattern = CLASS_NAME.get_or_init(|| {
            Regex::new(r"^-?[_a-zA-Z][_a-zA-Z0-9-]*$").expect("class name pattern is valid")
        });

        if pattern.is_match(class) {
            Ok(())
        } else {
            Err(PostError::InvalidClassName(class.to_string()))
        }
    }

    /// First element in document order carrying `marker` as a class.
    /// Nodes detached by an earlier update are skipped.
    fn target(&self, marker: &str) -> PostResult<ElementRef<'_>> {
        Self::validate_class(marker)?;
        let selector = Selector::parse(&format!(".{}", marker))
            .map_err(|_| PostError::InvalidClassName(marker.to_string()))?;
        let root = self.html.tree.root().id();

        self.html
            .select(&selector)
            .find(|element| element.ancestors().any(|a| a.id() == root))
            .ok_or_else(|| PostError::MissingTargetElement(marker.to_string()))
    }

    pub fn has_marked(&self, marker: &str) -> PostResult<bool> {
        match self.target(marker) {
            Ok(_) => Ok(true),
            Err(PostError::MissingTargetElement(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Rewrite the first element carrying the marker class.
    ///
    /// All checks run before the tree is touched, so a missing marker or a
    /// bad class name leaves the page as it was.
    pub fn apply(&mut self, update: &ElementUpdate) -> PostResult<()> {
        Self::validate_class(&update.presentation_class)?;
        let target = self.target(&update.marker_class)?;
        let id = target.id();
        let element = with_class(target.value(), &update.presentation_class);
        let namespace = element.name.ns.clone();

        tracing::debug!(
            marker = %update.marker_class,
            class = %update.presentation_class,
            "Updating marked element"
        );

        let mut node = self
            .html
            .tree
            .get_mut(id)
            .ok_or_else(|| PostError::MissingTargetElement(update.marker_class.clone()))?;
        *node.value() = Node::Element(element);

        while let Some(mut child) = node.first_child() {
            child.detach();
        }

        match &update.content {
            Content::Text(text) => {
                node.append(text_node(text));
            }
            Content::Link { href, text } => {
                let mut anchor = node.append(Node::Element(anchor(namespace, href)));
                anchor.append(text_node(text));
            }
        }

        Ok(())
    }

    pub fn inspect(&self, marker: &str) -> PostResult<ElementView> {
        let element = self.target(marker)?;

        Ok(ElementView {
            classes: element.value().classes().map(str::to_string).collect(),
            text: element.text().collect(),
        })
    }

    /// Serialize the page. Elements and comments go through scraper; the
    /// doctype is written here so its public and system ids survive.
    pub fn render(&self) -> String {
        let mut out = String::new();

        for child in self.html.tree.root().children() {
            match child.value() {
                Node::Doctype(doctype) => out.push_str(&doctype_tag(doctype)),
                Node::Comment(comment) => {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
                _ => {
                    if let Some(element) = ElementRef::wrap(child) {
                        out.push_str(&element.html());
                    }
                }
            }
        }

        out
    }
}

/// Copy of `element` with `class` appended to its class attribute
fn with_class(element: &Element, class: &str) -> Element {
    let attrs = element
        .attrs()
        .map(|(name, value)| {
            let value = if name == "class" {
                merge_class(value, class)
            } else {
                value.to_string()
            };
            attribute(name, value)
        })
        .collect();

    Element::new(element.name.clone(), attrs)
}

fn anchor(namespace: Namespace, href: &str) -> Element {
    Element::new(
        QualName::new(None, namespace, LocalName::from("a")),
        vec![attribute("href", href.to_string())],
    )
}

fn attribute(name: &str, value: String) -> Attribute {
    Attribute {
        name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
        value: StrTendril::from(value),
    }
}

fn text_node(text: &str) -> Node {
    Node::Text(Text {
        text: StrTendril::from(text),
    })
}

fn doctype_tag(doctype: &Doctype) -> String {
    let ids = match (doctype.public_id(), doctype.system_id()) {
        ("", "") => String::new(),
        ("", system) => format!(" SYSTEM \"{}\"", system),
        (public, "") => format!(" PUBLIC \"{}\"", public),
        (public, system) => format!(" PUBLIC \"{}\" \"{}\"", public, system),
    };

    format!("<!DOCTYPE {}{}>", doctype.name(), ids)
}

/// Append `class` to a class attribute unless it is already there
fn merge_class(existing: &str, class: &str) -> String {
    if existing.split_ascii_whitespace().any(|c| c == class) {
        existing.to_string()
    } else if existing.trim().is_empty() {
        class.to_string()
    } else {
        format!("{} {}", existing.trim_end(), class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Home</title></head>
<body>
  <div class="container newest-post">Loading...</div>
  <div class="newest-post">Second</div>
</body>
</html>"#;

    fn title_update(title: &str) -> ElementUpdate {
        ElementUpdate::new("newest-post", "jumbotron", Content::Text(title.to_string()))
    }

    #[test]
    fn test_update_adds_class_and_replaces_content() {
        let mut page = Page::parse(PAGE);
        page.apply(&title_update("Hello")).unwrap();

        let view = page.inspect("newest-post").unwrap();
        assert!(view.has_class("container"));
        assert!(view.has_class("newest-post"));
        assert!(view.has_class("jumbotron"));
        assert_eq!(view.text, "Hello");

        let html = page.render();
        assert!(html.contains(r#"<div class="container newest-post jumbotron">Hello</div>"#));
        assert!(!html.contains("Loading..."));
    }

    #[test]
    fn test_only_first_marked_element_changes() {
        let mut page = Page::parse(PAGE);
        page.apply(&title_update("Hello")).unwrap();

        let html = page.render();
        assert!(html.contains(r#"<div class="newest-post">Second</div>"#));
    }

    #[test]
    fn test_missing_marker_fails_before_mutation() {
        let source = "<html><body><div class=\"other\">Keep</div></body></html>";
        let mut page = Page::parse(source);
        let before = page.render();

        let err = page.apply(&title_update("Hello")).unwrap_err();
        assert!(matches!(err, PostError::MissingTargetElement(ref m) if m == "newest-post"));
        assert_eq!(page.render(), before);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut page = Page::parse(PAGE);
        page.apply(&title_update("Hello")).unwrap();
        let once = page.render();

        page.apply(&title_update("Hello")).unwrap();
        assert_eq!(page.render(), once);

        let view = page.inspect("newest-post").unwrap();
        assert_eq!(view.classes.len(), 3);
        assert!(view.has_class("jumbotron"));
    }

    #[test]
    fn test_presentation_class_not_duplicated() {
        let mut page = Page::parse(r#"<html><body><p class="newest-post jumbotron">x</p></body></html>"#);
        page.apply(&title_update("Hi")).unwrap();

        assert!(page
            .render()
            .contains(r#"<p class="newest-post jumbotron">Hi</p>"#));
    }

    #[test]
    fn test_title_markup_is_escaped() {
        let mut page = Page::parse(PAGE);
        page.apply(&title_update("<b>Rust</b> & friends")).unwrap();

        let html = page.render();
        assert!(html.contains("&lt;b&gt;Rust&lt;/b&gt; &amp; friends"));
        assert_eq!(page.inspect("newest-post").unwrap().text, "<b>Rust</b> & friends");
    }

    #[test]
    fn test_link_content() {
        let mut page = Page::parse(PAGE);
        page.apply(&ElementUpdate::new(
            "newest-post",
            "jumbotron",
            Content::Link {
                href: "https://x/1?a=1&b=2".to_string(),
                text: "Hello".to_string(),
            },
        ))
        .unwrap();

        assert!(page
            .render()
            .contains(r#"<a href="https://x/1?a=1&amp;b=2">Hello</a>"#));
        assert_eq!(page.inspect("newest-post").unwrap().text, "Hello");
    }

    #[test]
    fn test_inspect_without_update_shows_original() {
        let page = Page::parse(PAGE);
        let view = page.inspect("newest-post").unwrap();

        assert_eq!(view.text, "Loading...");
        assert!(!view.has_class("jumbotron"));
    }

    #[test]
    fn test_has_marked() {
        let page = Page::parse(PAGE);
        assert!(page.has_marked("newest-post").unwrap());
        assert!(!page.has_marked("missing").unwrap());
    }

    #[test]
    fn test_invalid_class_names_rejected() {
        assert!(Page::validate_class("newest-post").is_ok());
        assert!(Page::validate_class("_x").is_ok());
        assert!(Page::validate_class("").is_err());
        assert!(Page::validate_class("two words").is_err());
        assert!(Page::validate_class("9lives").is_err());

        let mut page = Page::parse(PAGE);
        let err = page
            .apply(&ElementUpdate::new("newest-post", "bad class", Content::Text("x".into())))
            .unwrap_err();
        assert!(matches!(err, PostError::InvalidClassName(_)));
    }

    #[test]
    fn test_untouched_markup_survives_render() {
        let source = r##"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">
<html><head><title>Home</title></head><body>
<svg><use xlink:href="#icon"></use></svg>
<!-- keep me -->
<script>if (a < b) {}</script>
<div class="newest-post">x</div>
</body></html>"##;
        let mut page = Page::parse(source);
        page.apply(&title_update("Hi")).unwrap();

        let html = page.render();
        assert!(html.starts_with(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#
        ));
        assert!(html.contains(r##"<use xlink:href="#icon"></use>"##));
        assert!(html.contains("<!-- keep me -->"));
        assert!(html.contains("<script>if (a < b) {}</script>"));
        assert!(html.contains(r#"<div class="newest-post jumbotron">Hi</div>"#));
    }

    #[test]
    fn test_plain_doctype() {
        let page = Page::parse("<!DOCTYPE html><html><body></body></html>");
        assert!(page.render().starts_with("<!DOCTYPE html><html>"));
    }

    #[test]
    fn test_replaced_children_are_not_targets() {
        let mut page = Page::parse(
            r#"<html><body><div class="newest-post"><span class="newest-post">inner</span></div></body></html>"#,
        );
        page.apply(&title_update("Hello")).unwrap();
        page.apply(&title_update("Again")).unwrap();

        let html = page.render();
        assert!(html.contains(r#"<div class="newest-post jumbotron">Again</div>"#));
        assert!(!html.contains("inner"));
    }

    #[test]
    fn test_merge_class() {
        assert_eq!(merge_class("newest-post", "jumbotron"), "newest-post jumbotron");
        assert_eq!(merge_class("a b ", "c"), "a b c");
        assert_eq!(merge_class("  ", "jumbotron"), "jumbotron");

        let once = merge_class("newest-post", "jumbotron");
        assert_eq!(merge_class(&once, "jumbotron"), once);
    }
}
