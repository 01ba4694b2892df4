use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionSource {
    ByteOrderMark,
    Utf8,
    Statistical,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedEncoding {
    pub encoding: &'static Encoding,
    pub source: DetectionSource,
}

impl DetectedEncoding {
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }
}

/// Picks the encoding of raw file bytes: a byte order mark wins, then strict
/// UTF-8, then a statistical guess. A guess that cannot decode the bytes
/// cleanly is replaced by windows-1252, which maps every byte.
pub fn detect_encoding(bytes: &[u8]) -> DetectedEncoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return DetectedEncoding {
            encoding,
            source: DetectionSource::ByteOrderMark,
        };
    }

    if std::str::from_utf8(bytes).is_ok() {
        return DetectedEncoding {
            encoding: UTF_8,
            source: DetectionSource::Utf8,
        };
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let guess = detector.guess(None, false);
    let (_, had_errors) = guess.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::debug!("Statistical guess {} does not fit, using fallback", guess.name());
        return DetectedEncoding {
            encoding: WINDOWS_1252,
            source: DetectionSource::Fallback,
        };
    }

    DetectedEncoding {
        encoding: guess,
        source: DetectionSource::Statistical,
    }
}

/// Decodes file bytes to UTF-8 text, stripping any byte order mark.
pub fn decode_text(bytes: &[u8]) -> (String, DetectedEncoding) {
    let detected = detect_encoding(bytes);
    let (text, _, _) = detected.encoding.decode(bytes);
    (text.into_owned(), detected)
}
