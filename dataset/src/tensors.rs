use candle_core::{Device, Tensor};

use crate::error::{DatasetError, Result};
use crate::sequence::Sequence;

/// A sequence (or a batch of them) as tensors ready for a training step.
#[derive(Debug, Clone)]
pub struct SequenceTensors {
    pub depths: Tensor,
    pub labels: Tensor,
    pub flows: Tensor,
    pub actual_configs: Tensor,
    pub commanded_configs: Tensor,
    pub controls: Tensor,
    pub poses: Tensor,
}

impl Sequence {
    pub fn to_tensors(&self, device: &Device) -> Result<SequenceTensors> {
        Ok(SequenceTensors {
            depths: Tensor::from_slice(&self.depths, self.depths_shape().to_vec(), device)?,
            labels: Tensor::from_slice(&self.labels, self.depths_shape().to_vec(), device)?,
            flows: Tensor::from_slice(&self.flows, self.flows_shape().to_vec(), device)?,
            actual_configs: Tensor::from_slice(
                &self.actual_configs,
                self.configs_shape().to_vec(),
                device,
            )?,
            commanded_configs: Tensor::from_slice(
                &self.commanded_configs,
                self.configs_shape().to_vec(),
                device,
            )?,
            controls: Tensor::from_slice(&self.controls, self.controls_shape().to_vec(), device)?,
            poses: Tensor::from_slice(&self.poses, self.poses_shape().to_vec(), device)?,
        })
    }
}

/// Stacks sequences along a new leading batch dimension.
pub fn stack_sequences(sequences: &[Sequence], device: &Device) -> Result<SequenceTensors> {
    if sequences.is_empty() {
        return Err(DatasetError::EmptyBatch);
    }

    let parts = sequences
        .iter()
        .map(|s| s.to_tensors(device))
        .collect::<Result<Vec<_>>>()?;

    let stack = |field: fn(&SequenceTensors) -> &Tensor| -> Result<Tensor> {
        let tensors: Vec<&Tensor> = parts.iter().map(field).collect();
        Ok(Tensor::stack(&tensors, 0)?)
    };

    Ok(SequenceTensors {
        depths: stack(|t| &t.depths)?,
        labels: stack(|t| &t.labels)?,
        flows: stack(|t| &t.flows)?,
        actual_configs: stack(|t| &t.actual_configs)?,
        commanded_configs: stack(|t| &t.commanded_configs)?,
        controls: stack(|t| &t.controls)?,
        poses: stack(|t| &t.poses)?,
    })
}
