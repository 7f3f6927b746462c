pub mod fasta;
pub mod gff;
pub use fasta::FastaSequence;
pub use gff::read_annotation_lines;
