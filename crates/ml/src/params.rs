use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::MlError;

/// Largest float count a raw blob may declare; its byte length must fit in
/// `isize`.
const MAX_RAW_FLOATS: usize = isize::MAX as usize / std::mem::size_of::<f32>();

/// Flat row-major snapshot of the policy parameters.
///
/// This is the whole persistence boundary: hosts choose the container. The
/// struct serialises with serde, and [`PolicyParams::write_raw`] /
/// [`PolicyParams::read_raw`] offer a raw blob of three `u32` dimensions
/// followed by `w1`, `b1`, `w2`, `b2` as native-endian `f32`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyParams {
    pub state_size: usize,
    pub hidden_size: usize,
    pub num_actions: usize,
    pub w1: Vec<f32>,
    pub b1: Vec<f32>,
    pub w2: Vec<f32>,
    pub b2: Vec<f32>,
}

impl PolicyParams {
    /// Verifies every tensor length against the recorded dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::ShapeMismatch`] naming the first inconsistent tensor.
    pub fn check_shapes(&self) -> Result<(), MlError> {
        if self.state_size == 0 || self.hidden_size == 0 || self.num_actions == 0 {
            return Err(MlError::ShapeMismatch("dimensions must be non-zero"));
        }
        if self.w1.len() != self.state_size * self.hidden_size {
            return Err(MlError::ShapeMismatch("w1 is not hidden_size x state_size"));
        }
        if self.b1.len() != self.hidden_size {
            return Err(MlError::ShapeMismatch("b1 is not hidden_size long"));
        }
        if self.w2.len() != self.hidden_size * self.num_actions {
            return Err(MlError::ShapeMismatch("w2 is not num_actions x hidden_size"));
        }
        if self.b2.len() != self.num_actions {
            return Err(MlError::ShapeMismatch("b2 is not num_actions long"));
        }
        Ok(())
    }

    /// Writes the raw blob form.
    ///
    /// # Errors
    ///
    /// Fails on inconsistent shapes, dimensions that do not fit in `u32`, or
    /// any write error.
    pub fn write_raw<W: Write>(&self, mut out: W) -> Result<(), MlError> {
        self.check_shapes()?;
        let mut header = [0u32; 3];
        for (slot, d) in header.iter_mut().zip([self.state_size, self.hidden_size, self.num_actions]) {
            *slot = u32::try_from(d).map_err(|_| MlError::ShapeMismatch("dimension exceeds u32"))?;
        }
        out.write_all(bytemuck::cast_slice(&header))?;
        for tensor in [&self.w1, &self.b1, &self.w2, &self.b2] {
            out.write_all(bytemuck::cast_slice(tensor))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Reads the raw blob form written by [`Self::write_raw`].
    ///
    /// The header is untrusted. Dimensions whose byte length cannot be
    /// addressed are rejected up front, and tensor storage grows only as
    /// bytes actually arrive, so a short file with a huge header fails with
    /// an I/O error instead of allocating what the header claims.
    ///
    /// # Errors
    ///
    /// Fails on truncated input or inconsistent or oversized dimensions.
    pub fn read_raw<R: Read>(mut input: R) -> Result<Self, MlError> {
        let mut header = [0u32; 3];
        input.read_exact(bytemuck::cast_slice_mut(&mut header))?;
        let [state_size, hidden_size, num_actions] = header.map(|d| d as usize);
        let too_large = || MlError::ShapeMismatch("dimensions too large for a parameter blob");
        let w1_len = state_size.checked_mul(hidden_size).ok_or_else(too_large)?;
        let w2_len = hidden_size.checked_mul(num_actions).ok_or_else(too_large)?;
        let total = [hidden_size, w2_len, num_actions]
            .into_iter()
            .try_fold(w1_len, usize::checked_add)
            .ok_or_else(too_large)?;
        if total > MAX_RAW_FLOATS {
            return Err(too_large());
        }

        let mut bytes = Vec::new();
        let mut read_tensor = |len: usize| -> Result<Vec<f32>, MlError> {
            let want = len * std::mem::size_of::<f32>();
            bytes.clear();
            input.by_ref().take(want as u64).read_to_end(&mut bytes)?;
            if bytes.len() != want {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }
            Ok(bytes.chunks_exact(4).map(bytemuck::pod_read_unaligned::<f32>).collect())
        };
        let params = Self {
            state_size,
            hidden_size,
            num_actions,
            w1: read_tensor(w1_len)?,
            b1: read_tensor(hidden_size)?,
            w2: read_tensor(w2_len)?,
            b2: read_tensor(num_actions)?,
        };
        params.check_shapes()?;
        Ok(params)
    }
}
