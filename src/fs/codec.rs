//! Payload decoding: base64 text and gzip streams.

use std::io::{self, Read};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::read::MultiGzDecoder;

use crate::error::DecodeError;
use crate::store::Content;

/// Turns one encoded payload into its original bytes.
///
/// Lazy backends are generic over the codec, so the decode step is the single
/// place where embedded data is transformed.
pub trait Codec: Send + Sync {
    /// Encoded form held by the payload store.
    type Encoded: Send + Sync;

    /// Decode one payload, gunzipping when `gzip` is set.
    fn decode(&self, encoded: &Self::Encoded, gzip: bool) -> Result<Content, DecodeError>;
}

/// Codec for byte-array payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl Codec for BytesCodec {
    type Encoded = Content;

    fn decode(&self, encoded: &Content, gzip: bool) -> Result<Content, DecodeError> {
        if gzip {
            gunzip(encoded).map(Content::from)
        } else {
            Ok(encoded.clone())
        }
    }
}

/// Codec for base64 text payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec for TextCodec {
    type Encoded = std::borrow::Cow<'static, str>;

    fn decode(&self, encoded: &Self::Encoded, gzip: bool) -> Result<Content, DecodeError> {
        let raw = decode_base64(encoded)?;
        if gzip {
            gunzip(&raw).map(Content::from)
        } else {
            Ok(Content::from(raw))
        }
    }
}

/// Decode standard base64, ignoring `\r` and `\n` line breaks.
///
/// Any other character outside the standard alphabet, including spaces and
/// tabs, is an error.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, DecodeError> {
    let is_break = |b: &u8| matches!(*b, b'\r' | b'\n');
    if text.bytes().any(|b| is_break(&b)) {
        let compact: Vec<u8> = text.bytes().filter(|b| !is_break(b)).collect();
        Ok(STANDARD.decode(compact)?)
    } else {
        Ok(STANDARD.decode(text)?)
    }
}

/// Decompress a complete gzip stream.
///
/// An empty input is not a valid stream and is reported as an error.
pub fn gunzip(data: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if data.is_empty() {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "empty gzip stream").into());
    }
    let mut out = Vec::with_capacity(data.len().saturating_mul(2));
    MultiGzDecoder::new(data).read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{encode_base64, gzip};

    #[test]
    fn test_gunzip_roundtrip() {
        let packed = gzip(b"hello hello hello", 6).unwrap();
        assert_eq!(gunzip(&packed).unwrap(), b"hello hello hello");
    }

    #[test]
    fn test_gunzip_truncated() {
        let packed = gzip(b"some data that will be cut short", 6).unwrap();
        let result = gunzip(&packed[..packed.len() / 2]);
        assert!(matches!(result, Err(DecodeError::Gzip(_))));
    }

    #[test]
    fn test_gunzip_bad_magic() {
        assert!(gunzip(b"definitely not gzip").is_err());
    }

    #[test]
    fn test_gunzip_empty() {
        assert!(gunzip(b"").is_err());
    }

    #[test]
    fn test_base64_with_wrapping() {
        assert_eq!(decode_base64("aGVs\nbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn test_base64_crlf_wrapping() {
        assert_eq!(decode_base64("aGVs\r\nbG8=\r\n").unwrap(), b"hello");
    }

    #[test]
    fn test_base64_space_is_decode_error() {
        for text in ["aGVs bG8=", "aGVs\tbG8=", "a G V s b G 8 =", "aGVs\x0cbG8="] {
            let result = decode_base64(text);
            assert!(matches!(result, Err(DecodeError::Base64(_))), "{text:?}");
        }
    }

    #[test]
    fn test_base64_invalid_chars() {
        let result = decode_base64("aGVs*G8=");
        assert!(matches!(result, Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_text_codec_gzip() {
        let encoded = encode_base64(&gzip(b"payload", 9).unwrap(), None);
        let decoded = TextCodec.decode(&encoded.into(), true).unwrap();
        assert_eq!(&*decoded, b"payload");
    }

    #[test]
    fn test_bytes_codec_plain_is_passthrough() {
        let content = Content::Static(b"raw");
        let decoded = BytesCodec.decode(&content, false).unwrap();
        assert!(matches!(decoded, Content::Static(_)));
        assert_eq!(decoded, content);
    }
}
