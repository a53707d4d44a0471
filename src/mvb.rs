//! Flat instruction scripts (`"type": "mvb"`).
//!
//! A body is a whitespace separated list of instructions. Instructions that
//! take an operand read the next token, which is either a literal (`#text`,
//! with `\s` standing for a space) or a positional argument (`%N`).
//!
//! ```text
//! GIT_ADD_ALL
//! GIT_COMMIT %0
//! PRINT #pushing\sto\sorigin
//! GIT_PUSH #origin\smain
//! ```

use crate::shell::quote;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct AssemblyError {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Literal(String),
    Argument(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Print(Operand),
    Sh(Operand),
    GitAddAll,
    GitAdd(Operand),
    GitCommitDefault,
    GitCommit(Operand),
    GitPushUpstream,
    GitPush(Operand),
}

/// What running one instruction amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Print(String),
    Shell(String),
}

pub fn assemble(source: &str) -> Result<Vec<Instruction>, AssemblyError> {
    let mut tokens = source
        .lines()
        .enumerate()
        .flat_map(|(i, line)| line.split_whitespace().map(move |t| (i + 1, t)));
    let mut program = Vec::new();

    while let Some((line, token)) = tokens.next() {
        let mut operand = || -> Result<Operand, AssemblyError> {
            let (line, raw) = tokens.next().ok_or_else(|| AssemblyError {
                line,
                message: format!("{} needs an operand", token),
            })?;
            parse_operand(line, raw)
        };

        let instruction = match token {
            "NOP" => Instruction::Nop,
            "PRINT" => Instruction::Print(operand()?),
            "SH" => Instruction::Sh(operand()?),
            "GIT_ADD_ALL" => Instruction::GitAddAll,
            "GIT_ADD" => Instruction::GitAdd(operand()?),
            "GIT_COMMIT_DEFAULT" => Instruction::GitCommitDefault,
            "GIT_COMMIT" => Instruction::GitCommit(operand()?),
            "GIT_PUSH_UPSTREAM" => Instruction::GitPushUpstream,
            "GIT_PUSH" => Instruction::GitPush(operand()?),
            other => {
                return Err(AssemblyError {
                    line,
                    message: format!("unknown instruction '{}'", other),
                })
            }
        };
        program.push(instruction);
    }

    Ok(program)
}

fn parse_operand(line: usize, raw: &str) -> Result<Operand, AssemblyError> {
    let fail = |message: String| AssemblyError { line, message };
    match raw.chars().next() {
        Some('#') => Ok(Operand::Literal(raw[1..].replace("\\s", " "))),
        Some('%') => raw[1..]
            .parse::<usize>()
            .map(Operand::Argument)
            .map_err(|_| fail(format!("'{}' is not a valid argument reference", raw))),
        Some('$') => Err(fail(format!("variables are not supported ('{}')", raw))),
        _ => Err(fail(format!("operand '{}' must start with '#' or '%'", raw))),
    }
}

/// Turns a program into steps, resolving `%N` through `argument`. A `None`
/// from `argument` means the index lies outside the script's declared count.
pub fn lower<'a>(
    program: &[Instruction],
    argument: impl Fn(usize) -> Option<&'a str>,
) -> Result<Vec<Step>, String> {
    let value = |operand: &Operand| -> Result<String, String> {
        match operand {
            Operand::Literal(text) => Ok(text.clone()),
            Operand::Argument(index) => argument(*index)
                .map(str::to_string)
                .ok_or_else(|| format!("argument %{} is out of range", index)),
        }
    };

    let mut steps = Vec::new();
    for instruction in program {
        let step = match instruction {
            Instruction::Nop => continue,
            Instruction::Print(text) => Step::Print(value(text)?),
            Instruction::Sh(script) => Step::Shell(value(script)?),
            Instruction::GitAddAll => Step::Shell("git add *".to_string()),
            Instruction::GitAdd(path) => Step::Shell(format!("git add {}", quote(&value(path)?))),
            Instruction::GitCommitDefault => Step::Shell(format!("git commit -m {}", quote("Commit"))),
            Instruction::GitCommit(message) => {
                Step::Shell(format!("git commit -m {}", quote(&value(message)?)))
            }
            Instruction::GitPushUpstream => Step::Shell("git push".to_string()),
            Instruction::GitPush(target) => {
                let target = value(target)?;
                let words: Vec<String> = target.split_whitespace().map(quote).collect();
                Step::Shell(format!("git push {}", words.join(" ")))
            }
        };
        steps.push(step);
    }
    Ok(steps)
}
