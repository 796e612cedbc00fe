//! YOLOv5 detector on the OpenCV `dnn` module

use super::{Device, ModelInput, Proposal};
use crate::Result;
use crate::traits::DetectionModel;
use anyhow::{Context, ensure};
use opencv::{
    core::{Mat, Scalar, Vector, CV_32F},
    dnn,
    prelude::*,
};
use std::path::Path;
use tracing::info;

/// YOLOv5 network loaded from an ONNX export of the trained weights
pub struct YoloModel {
    net: dnn::Net,
    input_size: u32,
    num_classes: usize,
    device: Device,
}

impl YoloModel {
    /// Load the network once and place it on `device`.
    ///
    /// OpenCV networks only run forward passes, so the model is in inference
    /// mode as soon as it is loaded.
    pub fn load<P: AsRef<Path>>(
        weights: P,
        device: Device,
        input_size: u32,
        num_classes: usize,
    ) -> Result<Self> {
        let weights = weights.as_ref();
        ensure!(weights.is_file(), "Model weights not found: {:?}", weights);

        let path_str = weights.to_string_lossy();
        let mut net = dnn::read_net_from_onnx(&path_str)
            .with_context(|| format!("Failed to load model: {}", path_str))?;

        let (backend, target) = match device {
            Device::Cuda => (dnn::DNN_BACKEND_CUDA, dnn::DNN_TARGET_CUDA),
            Device::Cpu => (dnn::DNN_BACKEND_OPENCV, dnn::DNN_TARGET_CPU),
        };
        net.set_preferable_backend(backend)?;
        net.set_preferable_target(target)?;

        info!(weights = %path_str, %device, "Loaded detection model");

        Ok(Self {
            net,
            input_size,
            num_classes,
            device,
        })
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// Copy the tensor into a 4-D `CV_32F` blob
    fn to_blob(&self, input: &ModelInput) -> Result<Mat> {
        ensure!(
            input.size == self.input_size,
            "model expects {0}x{0} input, got {1}x{1}",
            self.input_size,
            input.size
        );

        let side = input.size as i32;
        let mut blob = Mat::new_nd_with_default(&[1, 3, side, side], CV_32F, Scalar::all(0.0))?;
        blob.data_typed_mut::<f32>()?.copy_from_slice(&input.data);
        Ok(blob)
    }
}

impl DetectionModel for YoloModel {
    fn infer(&mut self, input: &ModelInput) -> Result<Vec<Proposal>> {
        let blob = self.to_blob(input)?;
        self.net.set_input(&blob, "", 1.0, Scalar::default())?;

        let names = self.net.get_unconnected_out_layers_names()?;
        let mut outputs = Vector::<Mat>::new();
        self.net
            .forward(&mut outputs, &names)
            .context("Model forward pass failed")?;

        // Single detect head output: (1, rows, 5 + classes)
        let output = outputs.get(0).context("Model produced no output")?;
        let data = output.data_typed::<f32>()?;

        Proposal::from_rows(data, self.num_classes)
    }
}
