//! Result output port for writing classification records.

use crate::domain::ClassificationRecord;

/// Port for outputting classification records.
pub trait ResultOutput: Send + Sync {
    /// Writes a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, record: &ClassificationRecord) -> anyhow::Result<()>;

    /// Writes a whole batch at once.
    ///
    /// Outputs that render a batch differently from a stream of records
    /// (a JSON array, for instance) override this. The default writes each
    /// record in turn.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_batch(&self, records: &[ClassificationRecord]) -> anyhow::Result<()> {
        records.iter().try_for_each(|r| self.write(r))
    }

    /// Flushes any buffered output.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
