// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod holdings;
pub mod recommend;
pub mod snapshots;
pub mod exporter;
pub mod doctor;
