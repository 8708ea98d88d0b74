use std::cell::RefCell;

use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
    states::RawKind,
};
use html5ever::tendril::StrTendril;

use crate::types::FormContext;

/// Extracts the login form target and its input fields from an HTML page.
///
/// The page is tokenized, not parsed into a tree, so every start tag is seen
/// as written, including forms nested in other forms or wrapped in
/// `<noscript>`. Tags are visited in source order:
/// - every `<input>` carrying both `name` and `value` is stored, a later input
///   with the same name replaces an earlier one
/// - every `<form>` carrying an `action` sets `submit_url`, so with several
///   forms on the page the last one wins
///
/// Inputs are collected no matter which form they belong to. Tags inside
/// `<script>` and `<style>` are text and ignored. A page without any
/// `<form action=...>` yields `submit_url == None`.
///
/// # Example
///
/// ```
/// let html = r#"<form action="https://login.vk.com/?act=login">
///     <input type="hidden" name="ip_h" value="477b">
/// </form>"#;
/// let form = scrape_form(html);
/// assert_eq!(form.submit_url.as_deref(), Some("https://login.vk.com/?act=login"));
/// ```
pub fn scrape_form(html: &str) -> FormContext {
    let tokenizer = Tokenizer::new(FormSink::default(), TokenizerOpts::default());
    let input = BufferQueue::default();
    input.push_back(StrTendril::from(html));

    let _ = tokenizer.feed(&input);
    tokenizer.end();

    tokenizer.sink.form.into_inner()
}

#[derive(Default)]
struct FormSink {
    form: RefCell<FormContext>,
}

impl FormSink {
    fn start_tag(&self, tag: &Tag) {
        let attr = |name: &str| {
            tag.attrs
                .iter()
                .find(|a| &*a.name.local == name)
                .map(|a| a.value.to_string())
        };

        let mut form = self.form.borrow_mut();
        match &*tag.name {
            "form" => {
                if let Some(action) = attr("action") {
                    form.submit_url = Some(action);
                }
            }
            "input" => {
                if let (Some(name), Some(value)) = (attr("name"), attr("value")) {
                    form.hidden_fields.insert(name, value);
                }
            }
            _ => {}
        }
    }
}

impl TokenSink for FormSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let Token::TagToken(tag) = token else {
            return TokenSinkResult::Continue;
        };
        if tag.kind != TagKind::StartTag {
            return TokenSinkResult::Continue;
        }

        self.start_tag(&tag);

        // without a tree builder the tokenizer has to be told where markup
        // stops being markup
        match &*tag.name {
            "script" if !tag.self_closing => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" if !tag.self_closing => TokenSinkResult::RawData(RawKind::Rawtext),
            _ => TokenSinkResult::Continue,
        }
    }
}
