//! Files from the bundle directory, with compression and cache policy applied.

use std::io::{Cursor, Write};
use std::path::Path;

use flate2::{write::GzEncoder, Compression};
use rocket::{
    http::ContentType,
    request::{self, FromRequest},
    response::{self, Responder},
    Request, Response,
};

use super::error::Result;

/// Bodies smaller than this are not worth compressing.
pub const GZIP_MIN_BYTES: usize = 1024;

pub const NO_CACHE: &str = "no-cache";
pub const IMMUTABLE: &str = "public, max-age=31536000, immutable";

const COMPRESSIBLE: &[&str] = &["html", "htm", "js", "mjs", "css", "json", "svg", "txt", "map"];

/// Whether the client will take a gzipped body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptsGzip(pub bool);

impl AcceptsGzip {
    pub fn parse(header: &str) -> Self {
        let accepted = header.split(',').any(|coding| {
            let mut parts = coding.split(';').map(str::trim);
            let name = parts.next().unwrap_or_default();
            let refused = parts.any(|param| {
                param
                    .strip_prefix("q=")
                    .and_then(|q| q.parse::<f32>().ok())
                    .map_or(false, |q| q <= 0.0)
            });
            (name.eq_ignore_ascii_case("gzip") || name == "*") && !refused
        });
        Self(accepted)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AcceptsGzip {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let accepts = req
            .headers()
            .get("Accept-Encoding")
            .any(|header| AcceptsGzip::parse(header).0);
        request::Outcome::Success(Self(accepts))
    }
}

/// The `Cache-Control` value for a file extension, if any.
pub fn cache_policy(extension: &str) -> Option<&'static str> {
    match extension {
        "html" | "htm" => Some(NO_CACHE),
        "js" | "mjs" | "css" => Some(IMMUTABLE),
        _ => None,
    }
}

fn compress(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(
        Vec::with_capacity((bytes.len() / 2).max(256)),
        Compression::default(),
    );
    encoder.write_all(bytes)?;
    encoder.finish()
}

/// A file ready to be sent.
#[derive(Debug)]
pub struct Asset {
    content_type: ContentType,
    cache_control: Option<&'static str>,
    gzipped: bool,
    body: Vec<u8>,
}

impl Asset {
    /// Read `path` and encode it for a client that does (or doesn't) take gzip.
    pub async fn load(path: &Path, gzip: AcceptsGzip) -> Result<Self> {
        let bytes = rocket::tokio::fs::read(path).await?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let content_type = ContentType::from_extension(&extension).unwrap_or(ContentType::Binary);
        let compressible = COMPRESSIBLE.contains(&extension.as_str());
        let (body, gzipped) = if gzip.0 && compressible && bytes.len() >= GZIP_MIN_BYTES {
            (compress(&bytes)?, true)
        } else {
            (bytes, false)
        };

        Ok(Self {
            content_type,
            cache_control: cache_policy(&extension),
            gzipped,
            body,
        })
    }

    pub fn is_gzipped(&self) -> bool {
        self.gzipped
    }
}

impl<'r> Responder<'r, 'static> for Asset {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let mut response = Response::build();
        response
            .header(self.content_type)
            .sized_body(self.body.len(), Cursor::new(self.body));
        if let Some(cache_control) = self.cache_control {
            response.raw_header("Cache-Control", cache_control);
        }
        if self.gzipped {
            response
                .raw_header("Content-Encoding", "gzip")
                .raw_header("Vary", "Accept-Encoding");
        }
        response.ok()
    }
}
