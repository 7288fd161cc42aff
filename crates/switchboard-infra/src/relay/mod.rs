pub mod http_upstream;

pub use http_upstream::HttpUpstream;
