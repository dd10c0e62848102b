// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

mod arg;
mod cli;
mod cmd_check;
mod cmd_explain;
mod cmd_fmt;
mod config;

pub use crate::cli::{Cli, Commands, run};
pub use crate::cmd_check::{CheckReport, CmdCheck, Rejected};
pub use crate::cmd_explain::CmdExplain;
pub use crate::cmd_fmt::CmdFmt;
pub use crate::config::parse_config;

/// Name used for the binary and the configuration directory.
pub const APP_NAME: &str = "calvalue";
