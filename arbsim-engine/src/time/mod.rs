// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

pub mod clock;
