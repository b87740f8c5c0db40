// --- File: crates/slotwise_voice/src/twiml.rs ---
//! Minimal TwiML document builder.
//!
//! Documents are written with `quick-xml`, which escapes text and attribute values.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use slotwise_common::SlotwiseError;
use std::io::{self, Cursor};
use tracing::error;

/// A `<Gather>` collecting one keypress or a spoken answer.
#[derive(Debug, Clone)]
pub struct Gather {
    pub action: String,
    pub language: String,
    pub num_digits: u8,
    pub prompts: Vec<String>,
}

#[derive(Debug, Clone)]
enum Verb {
    Say { language: String, text: String },
    Gather(Gather),
    Redirect(String),
    Hangup,
}

/// A `<Response>` document.
#[derive(Debug, Clone, Default)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn write_say(writer: &mut XmlWriter, language: &str, text: &str) -> io::Result<()> {
    let mut say = BytesStart::new("Say");
    say.push_attribute(("language", language));
    writer.write_event(Event::Start(say))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new("Say")))
}

fn write_verb(writer: &mut XmlWriter, verb: &Verb) -> io::Result<()> {
    match verb {
        Verb::Say { language, text } => write_say(writer, language, text),
        Verb::Gather(gather) => {
            let num_digits = gather.num_digits.to_string();
            let mut start = BytesStart::new("Gather");
            start.push_attribute(("input", "dtmf speech"));
            start.push_attribute(("numDigits", num_digits.as_str()));
            start.push_attribute(("action", gather.action.as_str()));
            start.push_attribute(("method", "POST"));
            start.push_attribute(("language", gather.language.as_str()));
            writer.write_event(Event::Start(start))?;
            for prompt in &gather.prompts {
                write_say(writer, &gather.language, prompt)?;
            }
            writer.write_event(Event::End(BytesEnd::new("Gather")))
        }
        Verb::Redirect(url) => {
            let mut redirect = BytesStart::new("Redirect");
            redirect.push_attribute(("method", "POST"));
            writer.write_event(Event::Start(redirect))?;
            writer.write_event(Event::Text(BytesText::new(url)))?;
            writer.write_event(Event::End(BytesEnd::new("Redirect")))
        }
        Verb::Hangup => writer.write_event(Event::Empty(BytesStart::new("Hangup"))),
    }
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, language: &str, text: impl Into<String>) -> Self {
        self.verbs.push(Verb::Say {
            language: language.to_string(),
            text: text.into(),
        });
        self
    }

    pub fn gather(mut self, gather: Gather) -> Self {
        self.verbs.push(Verb::Gather(gather));
        self
    }

    pub fn redirect(mut self, url: impl Into<String>) -> Self {
        self.verbs.push(Verb::Redirect(url.into()));
        self
    }

    pub fn hangup(mut self) -> Self {
        self.verbs.push(Verb::Hangup);
        self
    }

    /// Serialize to a TwiML document with an XML declaration.
    pub fn to_xml(&self) -> io::Result<String> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("Response")))?;
        for verb in &self.verbs {
            write_verb(&mut writer, verb)?;
        }
        writer.write_event(Event::End(BytesEnd::new("Response")))?;

        String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl IntoResponse for VoiceResponse {
    fn into_response(self) -> Response {
        match self.to_xml() {
            Ok(xml) => ([(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
            Err(e) => {
                error!("Failed to render TwiML: {}", e);
                SlotwiseError::from(e).into_response()
            }
        }
    }
}
