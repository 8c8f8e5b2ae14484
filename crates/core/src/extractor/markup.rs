//! html5ever tokenizer adapter.
//!
//! Runs the tokenizer without a tree builder and turns its tokens into
//! [`MarkupEvent`]s for the listing state machine. Adjacent character tokens
//! are joined so a run of text between two tags is a single event.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tracing::debug;
use url::Url;

use crate::ticket::Ticket;

use super::config::ExtractorConfig;
use super::state::{ExtractionAnomaly, ListingStateMachine, MarkupEvent};

/// Result of extracting one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Finished tickets in document order.
    pub tickets: Vec<Ticket>,
    /// Irregularities encountered; informational only.
    pub anomalies: Vec<ExtractionAnomaly>,
}

/// Extracts tickets from listing page markup.
///
/// Holds no per-page state, so one extractor can serve any number of pages,
/// including from several tasks at once.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    markers: ExtractorConfig,
}

impl ListingExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            markers: config.normalized(),
        }
    }

    /// Tickets found in `body`, with links resolved against `page_url`.
    pub fn extract(&self, body: &str, page_url: &Url) -> Vec<Ticket> {
        self.extract_detailed(body, page_url).tickets
    }

    /// Like [`extract`](Self::extract), also reporting anomalies.
    pub fn extract_detailed(&self, body: &str, page_url: &Url) -> Extraction {
        let sink = EventSink {
            machine: ListingStateMachine::new(&self.markers, page_url),
            text: String::new(),
        };

        let mut input = BufferQueue::new();
        input.push_back(StrTendril::from_slice(body));

        let mut tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
        let _ = tokenizer.feed(&mut input);
        tokenizer.end();

        let (tickets, anomalies) = tokenizer.sink.into_machine().finish();

        debug!(
            page = %page_url,
            tickets = tickets.len(),
            anomalies = anomalies.len(),
            "Extracted listings"
        );

        Extraction { tickets, anomalies }
    }
}

impl Default for ListingExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

struct EventSink<'a> {
    machine: ListingStateMachine<'a>,
    text: String,
}

impl<'a> EventSink<'a> {
    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            let text = std::mem::take(&mut self.text);
            self.machine.handle(&MarkupEvent::Text(text));
        }
    }

    fn into_machine(mut self) -> ListingStateMachine<'a> {
        self.flush_text();
        self.machine
    }
}

impl TokenSink for EventSink<'_> {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(chars) => self.text.push_str(&chars),
            Token::TagToken(tag) => {
                self.flush_text();
                let name = String::from(&*tag.name);
                match tag.kind {
                    TagKind::StartTag => {
                        let raw = raw_text_kind(&name).filter(|_| !tag.self_closing);
                        let attrs = tag
                            .attrs
                            .into_iter()
                            .map(|a| (String::from(&*a.name.local), String::from(&*a.value)))
                            .collect();
                        self.machine.handle(&MarkupEvent::StartTag { name, attrs });
                        if let Some(kind) = raw {
                            return TokenSinkResult::RawData(kind);
                        }
                    }
                    TagKind::EndTag => self.machine.handle(&MarkupEvent::EndTag { name }),
                }
            }
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => {
                self.flush_text()
            }
            Token::NullCharacterToken | Token::ParseError(_) => {}
        }
        TokenSinkResult::Continue
    }
}

/// Elements whose content must not be tokenized as markup.
fn raw_text_kind(name: &str) -> Option<RawKind> {
    match name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}
