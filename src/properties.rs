//! Sequence-type specific formulas.
//!
//! Every formula returns `None` when it does not apply to the kind it is
//! asked for; the engine stores that as `0.0` on the record.
//!
//! - GC enrichment and molecular weight: DNA and RNA
//! - Melting point: DNA only
//! - Net charge and isoelectric point: peptides (and, through the engine,
//!   the translated peptide of DNA/RNA records)

use log::debug;

use crate::alphabet::AlphabetCount;
use crate::model::SequenceKind;

/// Pseudo-residue standing for the free amino terminus.
pub const N_TERMINUS: char = '+';
/// Pseudo-residue standing for the free carboxyl terminus.
pub const C_TERMINUS: char = '-';

/// pH at which the engine reports net charge.
pub const REFERENCE_PH: f64 = 7.0;

/// Largest |net charge| accepted as neutral by the pI search.
pub const PI_TOLERANCE: f64 = 0.004;
/// Iteration cap for the pI search.
pub const PI_MAX_ITERATIONS: usize = 100;
const PI_MIN_BRACKET: f64 = 1e-6;
const PH_LOWER: f64 = 0.0;
const PH_UPPER: f64 = 14.0;

const DNA_END_CORRECTION: f64 = -61.96;
const RNA_END_CORRECTION: f64 = 159.00;

/// Nucleotide weights (g/mol).
const DNA_WEIGHTS: &[(char, f64)] = &[('A', 313.21), ('C', 289.18), ('G', 329.21), ('T', 304.20)];
const RNA_WEIGHTS: &[(char, f64)] = &[('A', 329.2), ('C', 305.2), ('G', 345.2), ('U', 306.2)];

/// Side chain and terminus pK values.
const PEPTIDE_PKS: &[(char, f64)] = &[
    ('C', 8.33),
    ('D', 3.86),
    ('E', 4.25),
    ('H', 6.0),
    ('K', 10.53),
    ('R', 12.48),
    ('Y', 10.07),
    (N_TERMINUS, 9.69),
    (C_TERMINUS, 2.34),
];

/// Groups carrying a positive charge when protonated.
const BASIC_GROUPS: [char; 3] = ['R', 'K', 'H'];
/// Groups carrying a negative charge when deprotonated.
const ACIDIC_GROUPS: [char; 4] = ['D', 'E', 'C', 'Y'];

impl SequenceKind {
    /// Monomer weights (nucleotides) or pK values (peptides).
    pub fn monomer_table(self) -> &'static [(char, f64)] {
        match self {
            SequenceKind::Dna => DNA_WEIGHTS,
            SequenceKind::Rna => RNA_WEIGHTS,
            SequenceKind::Peptide => PEPTIDE_PKS,
            SequenceKind::Ambiguous => &[],
        }
    }

    /// Looks up one monomer in `monomer_table`.
    pub fn monomer_value(self, monomer: char) -> Option<f64> {
        self.monomer_table()
            .iter()
            .find(|(c, _)| *c == monomer)
            .map(|&(_, value)| value)
    }
}

/// Fraction of G and C in a nucleotide sequence.
pub fn gc_enrichment(kind: SequenceKind, counts: &AlphabetCount, length: usize) -> Option<f64> {
    if !kind.is_nucleotide() {
        debug!("GC enrichment does not apply to {}", kind);
        return None;
    }
    if length == 0 {
        return Some(0.0);
    }
    Some(counts.sum_of(&['G', 'C']) / length as f64)
}

/// Molecular weight of a single strand, with the kind's end correction.
pub fn molecular_weight(kind: SequenceKind, counts: &AlphabetCount) -> Option<f64> {
    let correction = match kind {
        SequenceKind::Dna => DNA_END_CORRECTION,
        SequenceKind::Rna => RNA_END_CORRECTION,
        _ => {
            debug!("Molecular weight does not apply to {}", kind);
            return None;
        }
    };
    let sum: f64 = kind
        .monomer_table()
        .iter()
        .map(|&(base, weight)| counts.get(base) * weight)
        .sum();
    Some(sum + correction)
}

/// Melting temperature (°C) of a DNA duplex.
///
/// Below 14 bases the Wallace rule is used, above it the GC-content
/// formula. RNA is not covered.
pub fn melting_point(kind: SequenceKind, counts: &AlphabetCount, length: usize) -> Option<f64> {
    if kind != SequenceKind::Dna {
        debug!("Melting point does not apply to {}", kind);
        return None;
    }
    let at = counts.sum_of(&['A', 'T']);
    let gc = counts.sum_of(&['G', 'C']);
    if length < 14 {
        Some(at * 2.0 + gc * 4.0)
    } else {
        Some(64.9 + 41.0 * (gc - 16.4) / length as f64)
    }
}

/// Looks up a peptide pK. All entries are compile-time constants.
fn pk(group: char) -> f64 {
    SequenceKind::Peptide.monomer_value(group).unwrap_or(0.0)
}

/// Protonated fraction of a basic group, scaled by its count.
fn basic_fraction(count: f64, pk: f64, ph: f64) -> f64 {
    count * 10f64.powf(pk) / (10f64.powf(ph) + 10f64.powf(pk))
}

/// Deprotonated fraction of an acidic group, scaled by its count.
fn acidic_fraction(count: f64, pk: f64, ph: f64) -> f64 {
    count * 10f64.powf(ph) / (10f64.powf(ph) + 10f64.powf(pk))
}

/// Net charge of a peptide composition at `ph`.
///
/// Each terminus counts once. Residues without an entry in the pK table,
/// including the stop symbol `*`, do not contribute.
pub fn peptide_net_charge(counts: &AlphabetCount, ph: f64) -> f64 {
    let positive = basic_fraction(1.0, pk(N_TERMINUS), ph)
        + BASIC_GROUPS
            .iter()
            .map(|&aa| basic_fraction(counts.get(aa), pk(aa), ph))
            .sum::<f64>();
    let negative = acidic_fraction(1.0, pk(C_TERMINUS), ph)
        + ACIDIC_GROUPS
            .iter()
            .map(|&aa| acidic_fraction(counts.get(aa), pk(aa), ph))
            .sum::<f64>();
    positive - negative
}

/// Net charge for records declared as `kind`.
///
/// For DNA/RNA, `counts` must be the composition of the translated
/// peptide; the engine takes care of that.
pub fn net_charge(kind: SequenceKind, counts: &AlphabetCount, ph: f64) -> Option<f64> {
    match kind {
        SequenceKind::Ambiguous => {
            debug!("Net charge does not apply to {}", kind);
            None
        }
        _ => Some(peptide_net_charge(counts, ph)),
    }
}

/// pH at which the peptide composition is neutral.
///
/// Net charge falls monotonically with pH, so a bracketing bisection over
/// [0, 14] converges. When the charge does not change sign inside the
/// bracket the endpoint with the smaller |charge| is returned.
pub fn peptide_isoelectric_point(counts: &AlphabetCount) -> f64 {
    let mut lo = PH_LOWER;
    let mut hi = PH_UPPER;
    let charge_lo = peptide_net_charge(counts, lo);
    let charge_hi = peptide_net_charge(counts, hi);

    if charge_lo.abs() <= PI_TOLERANCE {
        return lo;
    }
    if charge_hi.abs() <= PI_TOLERANCE {
        return hi;
    }
    if charge_lo.signum() == charge_hi.signum() {
        debug!("Net charge keeps its sign over pH {}-{}", lo, hi);
        return if charge_lo.abs() < charge_hi.abs() { lo } else { hi };
    }

    for _ in 0..PI_MAX_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let charge = peptide_net_charge(counts, mid);
        if charge.abs() <= PI_TOLERANCE || hi - lo < PI_MIN_BRACKET {
            return mid;
        }
        if charge > 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    (lo + hi) / 2.0
}

/// Isoelectric point for records declared as `kind`.
///
/// Applies wherever `net_charge` does.
pub fn isoelectric_point(kind: SequenceKind, counts: &AlphabetCount) -> Option<f64> {
    match kind {
        SequenceKind::Ambiguous => {
            debug!("Isoelectric point does not apply to {}", kind);
            None
        }
        _ => Some(peptide_isoelectric_point(counts)),
    }
}
