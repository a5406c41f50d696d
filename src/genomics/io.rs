//! htslib-backed input and output: record streams, index totals, output files.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_htslib::bam::{self, header::Header, header::HeaderRecord, Read, Writer};
use thiserror::Error;
use tracing::debug;

use crate::genomics::AlignmentRecord;

/// Output path that may always be written, even though it exists.
pub const NULL_OUTPUT: &str = "/dev/null";

/// Failures at the alignment file and output file boundary.
#[derive(Debug, Error)]
pub enum AlignmentIoError {
    /// Input missing, unreadable, or of an undetectable format.
    #[error("failed to read sequence file {path}: {source}")]
    Open {
        /// Input path.
        path: PathBuf,
        /// htslib failure.
        #[source]
        source: rust_htslib::errors::Error,
    },
    /// Progress was requested for an input without an index.
    #[error("failed to read index for {path}, and progress reporting needs it")]
    IndexUnavailable {
        /// Input path.
        path: PathBuf,
    },
    /// The CSV target already exists.
    #[error("output file {path} already exists")]
    OutputExists {
        /// Output path.
        path: PathBuf,
    },
    /// The CSV target could not be created.
    #[error("failed to open output file {path} for writing: {source}")]
    OutputOpen {
        /// Output path.
        path: PathBuf,
        /// Underlying io failure.
        #[source]
        source: std::io::Error,
    },
    /// The BAM target could not be created.
    #[error("failed to open alignment output {path}: {source}")]
    WriterOpen {
        /// Output path.
        path: PathBuf,
        /// htslib failure.
        #[source]
        source: rust_htslib::errors::Error,
    },
    /// Decoding a record failed, e.g. on a truncated file.
    #[error("failed to read record: {0}")]
    Read(String),
    /// Writing a record failed.
    #[error("failed to write record: {0}")]
    Write(String),
}

impl From<&bam::Record> for AlignmentRecord {
    fn from(record: &bam::Record) -> Self {
        Self {
            tid: record.tid(),
            mtid: record.mtid(),
            pos: record.pos(),
            tlen: record.insert_size(),
            mapq: record.mapq(),
            flags: record.flags(),
        }
    }
}

/// SAM/BAM/CRAM input with its reference names.
pub struct AlignmentReader {
    path: PathBuf,
    reader: bam::Reader,
    references: Vec<Arc<str>>,
}

impl AlignmentReader {
    /// Open an alignment file, letting htslib detect the format.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AlignmentIoError> {
        let path = path.as_ref().to_path_buf();
        let reader = bam::Reader::from_path(&path).map_err(|source| AlignmentIoError::Open {
            path: path.clone(),
            source,
        })?;
        let references: Vec<Arc<str>> = reader
            .header()
            .target_names()
            .into_iter()
            .map(|name| Arc::from(String::from_utf8_lossy(name).as_ref()))
            .collect();
        debug!(path = %path.display(), references = references.len(), "opened alignment file");

        Ok(Self {
            path,
            reader,
            references,
        })
    }

    /// Input path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reference names indexed by reference id.
    pub fn references(&self) -> &[Arc<str>] {
        &self.references
    }

    /// Header of the input, for writers that copy it.
    pub fn header(&self) -> &bam::HeaderView {
        self.reader.header()
    }

    /// Lazily decode records in file order.
    pub fn records(
        &mut self,
    ) -> impl Iterator<Item = Result<AlignmentRecord, AlignmentIoError>> + '_ {
        self.raw_records()
            .map(|result| result.map(|record| AlignmentRecord::from(&record)))
    }

    /// Decode full htslib records in file order.
    pub fn raw_records(
        &mut self,
    ) -> impl Iterator<Item = Result<bam::Record, AlignmentIoError>> + '_ {
        self.reader
            .records()
            .map(|result| result.map_err(|err| AlignmentIoError::Read(err.to_string())))
    }
}

impl std::fmt::Debug for AlignmentReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlignmentReader")
            .field("path", &self.path)
            .field("references", &self.references.len())
            .finish()
    }
}

/// Record count of an indexed input: mapped and unmapped per reference plus
/// records without a coordinate.
pub fn index_total(path: impl AsRef<Path>) -> Result<u64, AlignmentIoError> {
    let path = path.as_ref();
    let unavailable = || AlignmentIoError::IndexUnavailable {
        path: path.to_path_buf(),
    };
    let mut reader = bam::IndexedReader::from_path(path).map_err(|_| unavailable())?;
    let stats = reader.index_stats().map_err(|_| unavailable())?;
    let total: u64 = stats
        .iter()
        .map(|&(_tid, _len, mapped, unmapped)| mapped + unmapped)
        .sum();
    debug!(path = %path.display(), total, "read index totals");
    Ok(total)
}

/// Refuse to clobber an existing CSV target unless it is the null device.
pub fn ensure_output_available(path: impl AsRef<Path>) -> Result<(), AlignmentIoError> {
    let path = path.as_ref();
    if path != Path::new(NULL_OUTPUT) && path.exists() {
        return Err(AlignmentIoError::OutputExists {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Create the CSV target after checking it does not exist yet.
pub fn create_csv_output(path: impl AsRef<Path>) -> Result<BufWriter<File>, AlignmentIoError> {
    let path = path.as_ref();
    ensure_output_available(path)?;
    let file = File::create(path).map_err(|source| AlignmentIoError::OutputOpen {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufWriter::new(file))
}

/// Create a BAM writer whose header lists `references` as `(name, length)`.
///
/// The caller is responsible for writing alignment records using the returned writer.
pub fn create_bam_writer<P: AsRef<Path>>(
    output_path: P,
    references: &[(&str, u64)],
) -> Result<Writer, AlignmentIoError> {
    let mut header = Header::new();

    let mut hd = HeaderRecord::new(b"HD");
    hd.push_tag(b"VN", &"1.6");
    hd.push_tag(b"SO", &"coordinate");
    header.push_record(&hd);

    for (name, length) in references {
        let mut sq = HeaderRecord::new(b"SQ");
        sq.push_tag(b"SN", name);
        sq.push_tag(b"LN", length);
        header.push_record(&sq);
    }

    open_bam_writer(output_path, &header)
}

/// Create a BAM writer with a header copied from an open input.
pub fn create_bam_writer_like<P: AsRef<Path>>(
    output_path: P,
    template: &AlignmentReader,
) -> Result<Writer, AlignmentIoError> {
    open_bam_writer(output_path, &Header::from_template(template.header()))
}

fn open_bam_writer<P: AsRef<Path>>(
    output_path: P,
    header: &Header,
) -> Result<Writer, AlignmentIoError> {
    let path = output_path.as_ref();
    bam::Writer::from_path(path, header, bam::Format::Bam).map_err(|source| {
        AlignmentIoError::WriterOpen {
            path: path.to_path_buf(),
            source,
        }
    })
}
