// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::process::Command as StdCommand;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "x", about = "Development tasks for the logsketch workspace")]
struct Command {
    #[command(subcommand)]
    sub: SubCommand,
}

impl Command {
    fn run(self) -> Result<(), String> {
        match self.sub {
            SubCommand::Build(cmd) => cmd.run(),
            SubCommand::Lint(cmd) => cmd.run(),
            SubCommand::Test(cmd) => cmd.run(),
        }
    }
}

#[derive(Subcommand)]
enum SubCommand {
    #[command(about = "Compile workspace packages.")]
    Build(CommandBuild),
    #[command(about = "Run format and clippy checks.")]
    Lint(CommandLint),
    #[command(about = "Run unit and integration tests.")]
    Test(CommandTest),
}

#[derive(Parser)]
struct CommandBuild {
    #[arg(long, help = "Assert that `Cargo.lock` will remain unchanged.")]
    locked: bool,
}

impl CommandBuild {
    fn run(self) -> Result<(), String> {
        let mut args = vec!["build", "--workspace", "--all-features", "--tests"];
        if self.locked {
            args.push("--locked");
        }
        run_cargo(&args)
    }
}

#[derive(Parser)]
struct CommandLint {
    #[arg(long, help = "Automatically apply lint suggestions.")]
    fix: bool,
}

impl CommandLint {
    fn run(self) -> Result<(), String> {
        if self.fix {
            run_cargo(&["fmt", "--all"])?;
            run_cargo(&[
                "clippy",
                "--workspace",
                "--all-targets",
                "--all-features",
                "--fix",
                "--allow-dirty",
                "--allow-staged",
            ])
        } else {
            run_cargo(&["fmt", "--all", "--check"])?;
            run_cargo(&[
                "clippy",
                "--workspace",
                "--all-targets",
                "--all-features",
                "--",
                "-D",
                "warnings",
            ])
        }
    }
}

#[derive(Parser)]
struct CommandTest {
    #[arg(long, help = "Run tests serially and do not capture output.")]
    no_capture: bool,
}

impl CommandTest {
    fn run(self) -> Result<(), String> {
        let mut args = vec!["test", "--workspace", "--all-features"];
        if self.no_capture {
            args.extend(["--", "--nocapture", "--test-threads=1"]);
        }
        run_cargo(&args)
    }
}

fn run_cargo(args: &[&str]) -> Result<(), String> {
    let cargo = which::which("cargo").map_err(|err| format!("cannot find cargo: {err}"))?;
    let status = StdCommand::new(&cargo)
        .args(args)
        .status()
        .map_err(|err| format!("failed to run {}: {err}", cargo.display()))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("`cargo {}` failed with {status}", args.join(" ")))
    }
}

fn main() -> ExitCode {
    match Command::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
