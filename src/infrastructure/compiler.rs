//! # Token Contract Compiler
//!
//! Wrapper around a `solc` binary for the fixed ERC-20 token source.
//!
//! The contract source is embedded and never edited at runtime; only the
//! token name and symbol vary, and those are constructor arguments, not
//! source edits. The compiler version is pinned and a single import
//! remapping resolves the OpenZeppelin ERC-20 base contract.
//!
//! Compilation happens once per run and the artifact is shared across
//! networks, so a compilation failure is fatal for the whole run.

use ethers::abi::Abi;
use ethers::solc::artifacts::{Settings, Source, Sources};
use ethers::solc::remappings::Remapping;
use ethers::solc::{CompilerInput, CompilerOutput, Solc};
use ethers::types::Bytes;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pinned solc version; any other version is a compilation error.
pub const PINNED_SOLC_VERSION: (u64, u64, u64) = (0, 8, 26);

/// Name of the contract inside [`TOKEN_CONTRACT_SOURCE`].
pub const TOKEN_CONTRACT_NAME: &str = "MyToken";

/// The fixed token contract source.
pub const TOKEN_CONTRACT_SOURCE: &str = r#"// SPDX-License-Identifier: MIT
pragma solidity ^0.8.0;

import "@openzeppelin/contracts/token/ERC20/ERC20.sol";

contract MyToken is ERC20 {
    constructor(string memory name, string memory symbol, uint256 initialSupply) ERC20(name, symbol) {
        _mint(msg.sender, initialSupply);
    }
}
"#;

/// Compilation errors.
#[derive(Debug, Error)]
pub enum CompilerError {
    /// The solc binary failed to run or report its version.
    #[error("solc error: {0}")]
    Solc(String),

    /// The installed solc does not match the pinned version.
    #[error("solc version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Pinned version.
        expected: String,
        /// Version reported by the binary.
        found: String,
    },

    /// The source failed to compile.
    #[error("compilation failed: {0}")]
    Compilation(String),

    /// The compiler output is missing an expected artifact.
    #[error("missing artifact: {0}")]
    MissingArtifact(String),
}

/// Compiled ABI and creation bytecode for the token contract.
#[derive(Debug, Clone)]
pub struct CompiledContract {
    /// Contract ABI.
    pub abi: Abi,
    /// Creation bytecode, before constructor arguments are appended.
    pub bytecode: Bytes,
}

/// Compiler for the embedded token contract.
#[derive(Debug, Clone)]
pub struct TokenCompiler {
    solc_path: PathBuf,
    openzeppelin_path: PathBuf,
}

impl TokenCompiler {
    /// Creates a compiler using the given solc binary and the directory
    /// the `@openzeppelin` import remaps to.
    #[must_use]
    pub fn new(solc_path: impl AsRef<Path>, openzeppelin_path: impl AsRef<Path>) -> Self {
        Self {
            solc_path: solc_path.as_ref().to_path_buf(),
            openzeppelin_path: openzeppelin_path.as_ref().to_path_buf(),
        }
    }

    /// Compiles the embedded token source into ABI and bytecode.
    ///
    /// # Errors
    ///
    /// Returns an error if the binary is missing or not the pinned
    /// version, if the source fails to compile, or if the output lacks
    /// the expected artifact.
    pub fn compile(&self) -> Result<CompiledContract, CompilerError> {
        let solc = Solc::new(&self.solc_path);
        let version = solc
            .version()
            .map_err(|e| CompilerError::Solc(e.to_string()))?;
        if (version.major, version.minor, version.patch) != PINNED_SOLC_VERSION {
            let (major, minor, patch) = PINNED_SOLC_VERSION;
            return Err(CompilerError::VersionMismatch {
                expected: format!("{major}.{minor}.{patch}"),
                found: format!("{}.{}.{}", version.major, version.minor, version.patch),
            });
        }

        let remapping: Remapping =
            format!("@openzeppelin={}", self.openzeppelin_path.display())
                .parse()
                .map_err(|e| CompilerError::Solc(format!("invalid remapping: {e}")))?;
        let mut settings = Settings::default();
        settings.remappings.push(remapping);

        let mut sources = Sources::new();
        sources.insert(
            PathBuf::from(format!("{TOKEN_CONTRACT_NAME}.sol")),
            Source::new(TOKEN_CONTRACT_SOURCE),
        );

        let input = CompilerInput {
            language: "Solidity".to_string(),
            sources,
            settings,
        };

        let output: CompilerOutput = solc
            .compile(&input)
            .map_err(|e| CompilerError::Solc(e.to_string()))?;

        let diagnostics: Vec<String> = output
            .errors
            .iter()
            .filter(|e| e.severity.is_error())
            .map(|e| {
                e.formatted_message
                    .clone()
                    .unwrap_or_else(|| e.message.clone())
            })
            .collect();
        if !diagnostics.is_empty() {
            return Err(CompilerError::Compilation(diagnostics.join("\n")));
        }

        let contract = output
            .find(TOKEN_CONTRACT_NAME)
            .ok_or_else(|| CompilerError::MissingArtifact(TOKEN_CONTRACT_NAME.to_string()))?;
        let abi = contract
            .abi
            .cloned()
            .ok_or_else(|| CompilerError::MissingArtifact("abi".to_string()))?;
        let bytecode = contract
            .bin
            .and_then(|b| b.as_bytes())
            .cloned()
            .ok_or_else(|| CompilerError::MissingArtifact("bytecode".to_string()))?;

        Ok(CompiledContract { abi, bytecode })
    }
}
