use std::collections::HashSet;

use blake3::hash;
use morse_tree::{Codec, CodecOptions};

const MESSAGES: [&str; 4] = [
    "What hath God wrought",
    "SOS",
    "the quick brown fox jumps over the lazy dog 1234567890",
    "a+b=c / 2",
];

fn transcript(codec: &Codec, options: CodecOptions) -> String {
    let mut out = String::new();
    for message in MESSAGES {
        let morse = codec.encode(message, options).expect("message fits");
        out.push_str(&morse);
        out.push('\n');
        out.push_str(&codec.decode(&morse, options));
        out.push('\n');
    }
    out
}

#[test]
fn fresh_codecs_produce_identical_transcripts() {
    let options = CodecOptions::separated().with_prosigns(true);

    let mut fingerprints = HashSet::new();
    for _ in 0..5 {
        let codec = Codec::new().expect("codec initialises");
        fingerprints.insert(hash(transcript(&codec, options).as_bytes()));
    }

    assert_eq!(fingerprints.len(), 1, "outputs diverged across runs");
}

#[test]
fn hide_and_reveal_leave_no_trace() {
    let options = CodecOptions::new();
    let pristine = Codec::new().expect("codec initialises");
    let expected = hash(transcript(&pristine, options).as_bytes());

    let mut codec = Codec::new().expect("codec initialises");
    for symbol in "ETAOIN".chars() {
        codec.hide(symbol);
    }
    assert_ne!(hash(transcript(&codec, options).as_bytes()), expected);

    for symbol in "etaoin".chars() {
        codec.reveal(symbol).expect("symbol is in the alphabet");
    }
    assert_eq!(hash(transcript(&codec, options).as_bytes()), expected);
}
