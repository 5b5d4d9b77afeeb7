//! Per-version frame body decoding.
//!
//! The `version` field of a frame header tags how its body is packed:
//! `0`/`1` mean the body is the final payload, `2` means a zlib-deflate
//! stream, `3` means a Brotli stream. For versions 2 and 3 the decoded
//! bytes are themselves a run of nested frames and must be fed back
//! through [`decode_all`](crate::decode_all) by the caller.
//!
//! Nothing here panics across the boundary: a broken stream comes back as
//! an error the caller downgrades to "this frame carried no payload."

use std::io::Read;

use flate2::{Decompress, FlushDecompress, Status};

use crate::ProtocolError;

const INFLATE_CHUNK: usize = 8 * 1024;

/// Decodes a frame body according to its protocol-version tag.
///
/// An empty body is an empty payload at every known version, never an
/// error. An unknown version is an error so the caller can skip the frame.
pub fn decode_payload(version: u16, body: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    match version {
        0 | 1 => Ok(body.to_vec()),
        2 => inflate_zlib(body),
        3 => inflate_brotli(body),
        other => Err(ProtocolError::UnsupportedVersion(other)),
    }
}

/// Streaming zlib inflate.
///
/// Runs the inflater until it reports end-of-stream, or until it can make
/// no forward progress on a fully consumed input; in that case the output
/// produced so far is returned, matching the feed's occasional habit of
/// cutting a deflate stream short.
fn inflate_zlib(body: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(body.len().max(64) * 2);

    loop {
        let consumed = inflater.total_in() as usize;
        let produced = inflater.total_out();
        if out.len() == out.capacity() {
            out.reserve(INFLATE_CHUNK);
        }

        let status =
            inflater.decompress_vec(&body[consumed..], &mut out, FlushDecompress::None)?;

        match status {
            Status::StreamEnd => break,
            Status::Ok | Status::BufError => {
                let stalled = inflater.total_in() as usize == consumed
                    && inflater.total_out() == produced;
                if stalled {
                    // Needs input it cannot get; keep what was decoded.
                    break;
                }
            }
        }
    }

    Ok(out)
}

/// Brotli decompression of the full body via a streaming reader.
fn inflate_brotli(body: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = brotli::Decompressor::new(body, INFLATE_CHUNK);
    let mut out = Vec::with_capacity(body.len().max(64) * 2);
    reader
        .read_to_end(&mut out)
        .map_err(ProtocolError::Brotli)?;
    Ok(out)
}
