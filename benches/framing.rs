use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sensenova_relay::protocol::sensenova::NovaStreamChunk;
use sensenova_relay::protocol::convert::stream_chunk_to_openai;
use sensenova_relay::stream::{strip_frame_marker, FrameScanner};

/// One realistic upstream frame: an id line plus a data line with a short
/// delta, closed by the double-newline terminator.
fn sample_frame(seq: usize) -> Vec<u8> {
    format!(
        "id:{seq}\ndata:{{\"data\":{{\"id\":\"chat-{seq}\",\"choices\":[{{\"delta\":\"token \",\"index\":0,\"finish_reason\":\"\"}}]}},\"usage\":{{\"prompt_tokens\":0,\"completion_tokens\":0,\"total_tokens\":0}}}}\n\n"
    )
    .into_bytes()
}

/// A streaming body re-chunked at awkward boundaries, the way it arrives off
/// the socket.
fn rechunk(frames: &[Vec<u8>], chunk_len: usize) -> Vec<Vec<u8>> {
    let joined: Vec<u8> = frames.iter().flatten().copied().collect();
    joined.chunks(chunk_len).map(<[u8]>::to_vec).collect()
}

fn bench_frame_scanner(c: &mut Criterion) {
    let frames: Vec<Vec<u8>> = (0..64).map(sample_frame).collect();
    let chunks = rechunk(&frames, 53);

    c.bench_function("scan_64_frames_awkward_chunks", |b| {
        b.iter(|| {
            let mut scanner = FrameScanner::new();
            let mut count = 0usize;
            for chunk in &chunks {
                scanner.push(black_box(chunk));
                while let Some(frame) = scanner.next_frame() {
                    if strip_frame_marker(&frame).is_some() {
                        count += 1;
                    }
                }
            }
            if scanner.finish().is_some() {
                count += 1;
            }
            black_box(count)
        });
    });
}

fn bench_chunk_translation(c: &mut Criterion) {
    let payload = b"{\"data\":{\"id\":\"chat-1\",\"choices\":[{\"delta\":\"token \",\"index\":0,\"finish_reason\":\"\"}]},\"usage\":{\"prompt_tokens\":12,\"completion_tokens\":34,\"total_tokens\":46}}";

    c.bench_function("decode_translate_encode_chunk", |b| {
        b.iter(|| {
            let chunk: NovaStreamChunk = serde_json::from_slice(black_box(payload)).unwrap();
            let event = stream_chunk_to_openai(&chunk);
            black_box(serde_json::to_string(&event).unwrap())
        });
    });
}

criterion_group!(benches, bench_frame_scanner, bench_chunk_translation);
criterion_main!(benches);
