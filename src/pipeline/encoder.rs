//! Inline-image protocol encoding.
//!
//! Serializes a pixel image to PNG (lossless, which avoids banding in
//! technical imagery), base64-encodes it, and frames it in the iTerm2
//! control sequence:
//!
//! ```text
//! ESC ] 1337 ; File = inline=1;size=N;name=B64;width=TOK;height=TOK;preserveAspectRatio=0|1[;type=T] : PAYLOAD BEL
//! ```
//!
//! When the session runs inside a terminal multiplexer the whole sequence is
//! wrapped in the passthrough envelope `ESC P tmux ; ... ESC \`, with every
//! embedded ESC byte doubled per that envelope's escaping rule.

use crate::core::constants::PROTOCOL_PAYLOAD_LIMIT;
use crate::core::{RenderError, RenderResult};
use crate::pipeline::render_spec::RenderSpec;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::io::Cursor;

const ESC: u8 = 0x1b;
const BEL: u8 = 0x07;

/// Compresses a pixel image into PNG container bytes.
///
/// This is the pre-control-sequence payload; download mode writes these
/// bytes to a file instead of framing them for the terminal.
///
/// # Errors
///
/// Returns [`RenderError::Codec`] if PNG encoding fails.
pub fn encode_png(img: &RgbImage) -> RenderResult<Vec<u8>> {
    let mut bytes = Vec::new();
    let encoder = PngEncoder::new(Cursor::new(&mut bytes));
    encoder.write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes)
}

/// Builds the complete escape sequence for displaying `img` inline.
///
/// The returned bytes are ready to write to the terminal's output stream.
/// `name` is carried base64-encoded in the `name` key (the terminal uses it
/// as a download file name); a non-empty `file_type` is carried verbatim in
/// the optional `type` key as a content hint. With `passthrough` set the
/// sequence is wrapped in the multiplexer envelope.
///
/// # Errors
///
/// Returns [`RenderError::InvalidDimension`] when a pixel-unit render spec
/// contradicts the image's aspect ratio without `stretch`,
/// [`RenderError::Codec`] on compression failure, and
/// [`RenderError::PayloadTooLarge`] when the final sequence exceeds
/// [`PROTOCOL_PAYLOAD_LIMIT`]. The sequence is never truncated: a truncated
/// base64 payload would decode to a corrupt image with no indication.
pub fn encode(
    img: &RgbImage,
    spec: &RenderSpec,
    name: &str,
    file_type: &str,
    passthrough: bool,
) -> RenderResult<Vec<u8>> {
    spec.check_aspect(img.width(), img.height())?;

    let png = encode_png(img)?;
    let payload = BASE64.encode(&png);

    let mut sequence = String::with_capacity(payload.len() + 128);
    sequence.push(ESC as char);
    sequence.push_str("]1337;File=inline=1");
    sequence.push_str(&format!(";size={}", png.len()));
    sequence.push_str(&format!(";name={}", BASE64.encode(name)));
    sequence.push_str(&format!(";width={}", spec.width));
    sequence.push_str(&format!(";height={}", spec.height));
    sequence.push_str(&format!(
        ";preserveAspectRatio={}",
        u8::from(!spec.stretch)
    ));
    if !file_type.is_empty() {
        sequence.push_str(&format!(";type={file_type}"));
    }
    sequence.push(':');
    sequence.push_str(&payload);
    sequence.push(BEL as char);

    let bytes = if passthrough {
        wrap_passthrough(sequence.as_bytes())
    } else {
        sequence.into_bytes()
    };

    if bytes.len() > PROTOCOL_PAYLOAD_LIMIT {
        return Err(RenderError::payload_too_large(
            bytes.len(),
            PROTOCOL_PAYLOAD_LIMIT,
        ));
    }
    Ok(bytes)
}

/// Wraps a control sequence in the tmux passthrough envelope.
///
/// Every ESC byte of the inner sequence is doubled so the multiplexer
/// forwards it to the outer terminal instead of interpreting it.
fn wrap_passthrough(sequence: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(sequence.len() + 16);
    out.extend_from_slice(b"\x1bPtmux;");
    for &b in sequence {
        if b == ESC {
            out.push(ESC);
        }
        out.push(b);
    }
    out.extend_from_slice(b"\x1b\\");
    out
}
