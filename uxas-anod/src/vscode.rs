/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! `c_cpp_properties.json` for the VS Code C/C++ extension.

use std::env;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Variable holding the include path list in the exported build environment.
pub const INCLUDE_PATH_VAR: &str = "CPLUS_INCLUDE_PATH";

const WORKSPACE_GLOB: &str = "${workspaceFolder}/**";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Configuration<'a> {
    name: &'a str,
    include_path: Vec<&'a str>,
    defines: Vec<&'a str>,
    compiler_path: &'a str,
    c_standard: &'a str,
    cpp_standard: &'a str,
    intelli_sense_mode: &'a str,
}

#[derive(Debug, Serialize)]
struct Properties<'a> {
    configurations: Vec<Configuration<'a>>,
    version: u32,
}

/// Splits a path-list value on the platform separator (`:` on Unix).
pub fn split_include_paths(value: &str) -> Vec<String> {
    env::split_paths(value)
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}

/// Renders the configuration, four-space indented, with a trailing newline.
pub fn render_c_cpp_properties(include_paths: &[String]) -> Result<String, serde_json::Error> {
    let mut include_path = vec![WORKSPACE_GLOB];
    include_path.extend(include_paths.iter().map(String::as_str));

    let properties = Properties {
        configurations: vec![Configuration {
            name: "OpenUxAS",
            include_path,
            defines: Vec::new(),
            compiler_path: "/usr/bin/gcc",
            c_standard: "gnu11",
            cpp_standard: "gnu++11",
            intelli_sense_mode: "gcc-x64",
        }],
        version: 4,
    };

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    properties.serialize(&mut ser)?;

    let mut out = String::from_utf8_lossy(&buf).into_owned();
    out.push('\n');
    Ok(out)
}
