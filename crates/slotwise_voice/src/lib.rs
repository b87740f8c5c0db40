/// Twilio Voice webhook handlers.
pub mod doc;
pub mod handlers;
#[cfg(test)]
mod handlers_test;
pub mod routes;
/// TwiML document building and escaping.
pub mod twiml;
