/*!
# Corpus Plumbing

Everything between a corpus of annotated commit-files and the files a
sequence model trains on.

- [`record`] - commit-file JSONL records and pair categories
- [`bucket`] - project-to-bucket assignment
- [`pipeline`] - per-record sequence, abstraction and mutant processing
- [`sink`] - paired `.buggy`/`.correct` and single `.seq` output files
- [`filter`] - sequence length filter over file pairs
- [`xvalid`] - cross-validation fold split
*/

pub mod bucket;
pub mod filter;
pub mod pipeline;
pub mod record;
pub mod sink;
pub mod xvalid;

pub use bucket::BucketAssigner;
pub use filter::{filter_directory, FilterStats};
pub use pipeline::{
    abstracted_record, annotated_record, mine_record, mutant_record, MutantSet, RecordOutput,
    SequencePair,
};
pub use record::{read_lines, Category, CommitFile, PairType, SliceChangePair};
pub use sink::SequenceSink;
pub use xvalid::{build_folds, FoldStats, SplitOptions};
