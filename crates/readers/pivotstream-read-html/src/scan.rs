//! Forward event scan over HTML/XHTML markup.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// Receives markup events from [`scan`].
///
/// Tag names are lowercase local names (`epub:switch` arrives as
/// `switch`). Text arrives in arbitrary pieces; character references are
/// already decoded.
pub trait HtmlHandler {
    fn start_tag(&mut self, _name: &str, _attrs: &Attributes) {}
    fn end_tag(&mut self, _name: &str) {}
    fn text(&mut self, _text: &str) {}
}

/// Feed every event to both handlers, left first.
impl<A: HtmlHandler, B: HtmlHandler> HtmlHandler for (A, B) {
    fn start_tag(&mut self, name: &str, attrs: &Attributes) {
        self.0.start_tag(name, attrs);
        self.1.start_tag(name, attrs);
    }

    fn end_tag(&mut self, name: &str) {
        self.0.end_tag(name);
        self.1.end_tag(name);
    }

    fn text(&mut self, text: &str) {
        self.0.text(text);
        self.1.text(text);
    }
}

/// Attributes of a start tag, keys lowercased with their prefix kept
/// (`epub:type`), values entity-decoded.
#[derive(Debug, Clone, Default)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Value of the attribute named `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(key, value)` pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn from_tag(tag: &Tag) -> Self {
        let attrs = tag
            .attrs
            .iter()
            .map(|attr| {
                let key = match &attr.name.prefix {
                    Some(prefix) => format!("{prefix}:{}", attr.name.local),
                    None => attr.name.local.to_string(),
                };
                (key.to_ascii_lowercase(), attr.value.to_string())
            })
            .collect();
        Self(attrs)
    }
}

/// Scan `html` from start to end, dispatching events to `handler`.
///
/// Tokenizes with the HTML5 rules, so bare `&` and `<` in text, omitted
/// end tags and unclosed elements all scan without losing text. Nothing
/// is reordered: events arrive in source order with no implied tags.
/// Self-closing tags (`<br/>`, `<p/>`) produce a start and an end event.
/// Script and style bodies are raw text.
pub fn scan<H: HtmlHandler + ?Sized>(html: &str, handler: &mut H) {
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));

    let tokenizer = Tokenizer::new(
        EventSink {
            handler: RefCell::new(handler),
        },
        TokenizerOpts::default(),
    );
    let _ = tokenizer.feed(&input);
    tokenizer.end();
}

/// Adapts an [`HtmlHandler`] to the tokenizer's sink interface.
struct EventSink<'h, H: ?Sized> {
    handler: RefCell<&'h mut H>,
}

impl<H: HtmlHandler + ?Sized> TokenSink for EventSink<'_, H> {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut handler = self.handler.borrow_mut();
        match token {
            Token::TagToken(tag) => {
                let name = tag_name(&tag.name);
                match tag.kind {
                    TagKind::StartTag => {
                        handler.start_tag(name, &Attributes::from_tag(&tag));
                        if tag.self_closing {
                            handler.end_tag(name);
                        } else if let Some(kind) = raw_kind(name) {
                            return TokenSinkResult::RawData(kind);
                        }
                    }
                    TagKind::EndTag => handler.end_tag(name),
                }
            }
            Token::CharacterTokens(text) => handler.text(&text),
            Token::ParseError(err) => log::trace!("html scan: {err}"),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Local part of a tag name (`epub:switch` is `switch`).
fn tag_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Elements whose content is not markup.
fn raw_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}
