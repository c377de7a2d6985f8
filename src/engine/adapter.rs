use tracing::debug;

use crate::engine::{EngineRequest, VolumeEngine};
use crate::error::VolumeError;
use crate::models::{CalcMode, RawVolumeResult, MAX_LOGS};

/// Owns the fixed-size working buffers for engine calls and marshals
/// requests into them.
///
/// Buffers are zeroed before every call and reused across calls, so an
/// adapter (and any calculator holding one) is not safe to share between
/// threads; use one instance per thread. Separate instances are fully
/// independent.
pub struct VolumeEngineAdapter {
    engine: Box<dyn VolumeEngine>,
    buffers: RawVolumeResult,
}

impl VolumeEngineAdapter {
    pub fn new(engine: Box<dyn VolumeEngine>) -> Self {
        Self {
            engine,
            buffers: RawVolumeResult::default(),
        }
    }

    /// Run one engine call. Returns the engine's error code unchanged; the
    /// adapter does not interpret it.
    ///
    /// In variable-length mode the caller's explicit log lengths are
    /// validated and loaded into the length buffer before the call.
    pub fn run(&mut self, request: &EngineRequest<'_>) -> Result<i32, VolumeError> {
        self.buffers.reset();

        if request.mode == CalcMode::VariableLength {
            request.tree.validate_log_lengths()?;
            self.load_log_lengths(&request.tree.log_lengths)?;
        }

        debug!(
            vol_eq = request.vol_eq,
            region = request.region,
            dbh = request.tree.dbh_ob,
            height = request.tree.total_height,
            mode = ?request.mode,
            "invoking volume engine"
        );

        let code = self.engine.compute(request, &mut self.buffers);
        self.buffers.error_flag = code;
        Ok(code)
    }

    /// The raw result of the most recent call.
    pub fn raw(&self) -> &RawVolumeResult {
        &self.buffers
    }

    fn load_log_lengths(&mut self, lengths: &[f64]) -> Result<(), VolumeError> {
        let wanted: Vec<f64> = lengths.iter().copied().take_while(|&l| l != 0.0).collect();
        if wanted.len() > MAX_LOGS {
            return Err(VolumeError::Configuration(format!(
                "at most {MAX_LOGS} log lengths are supported, got {}",
                wanted.len()
            )));
        }
        for (i, len) in wanted.iter().enumerate() {
            self.buffers.log_len[i] = *len;
        }
        Ok(())
    }
}
