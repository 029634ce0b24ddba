// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Latent tensors and the compression-model interface.

pub mod codec;
pub mod tensor;

pub use codec::{BlockMeanCodec, LatentCodec};
pub use tensor::LatentTensor;
