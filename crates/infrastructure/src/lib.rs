pub mod dns;
pub mod url_request;
