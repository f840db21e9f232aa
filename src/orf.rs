//! Open reading frame scanning on the forward strand of a nucleotide
//! sequence (e.g. a spliced isoform).

const START: &[u8; 3] = b"ATG";
const STOPS: [&[u8; 3]; 3] = [b"TAA", b"TAG", b"TGA"];

/// 0-based half-open ORF; `end` includes the stop codon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orf {
    pub start: usize,
    pub end: usize,
    pub frame: u8,
}

impl Orf {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn codons(&self) -> usize {
        self.len() / 3
    }
}

fn codon_at(seq: &[u8], i: usize) -> Option<[u8; 3]> {
    let c = seq.get(i..i + 3)?;
    let norm = |b: u8| match b.to_ascii_uppercase() {
        b'U' => b'T',
        x => x,
    };
    Some([norm(c[0]), norm(c[1]), norm(c[2])])
}

/// All `ATG ... stop` frames of at least `min_codons` codons (stop
/// included), ordered by start.
///
/// Within a frame, scanning resumes after each stop, so nested in-frame ATGs
/// are not reported separately. Unterminated reading frames are dropped.
pub fn find_orfs(seq: &[u8], min_codons: usize) -> Vec<Orf> {
    let mut out = Vec::new();

    for frame in 0..3usize {
        let mut open: Option<usize> = None;
        let mut i = frame;
        while let Some(codon) = codon_at(seq, i) {
            match open {
                None if &codon == START => open = Some(i),
                Some(start) if STOPS.iter().any(|s| **s == codon) => {
                    let orf = Orf {
                        start,
                        end: i + 3,
                        frame: frame as u8,
                    };
                    if orf.codons() >= min_codons {
                        out.push(orf);
                    }
                    open = None;
                }
                _ => {}
            }
            i += 3;
        }
    }

    out.sort_by_key(|o| (o.start, o.end));
    out
}

/// Longest ORF; the first by start wins ties.
pub fn longest_orf(seq: &[u8], min_codons: usize) -> Option<Orf> {
    find_orfs(seq, min_codons)
        .into_iter()
        .fold(None, |best: Option<Orf>, o| match best {
            Some(b) if b.len() >= o.len() => Some(b),
            _ => Some(o),
        })
}
