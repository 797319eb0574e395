//! Test utilities and mocks for purser unit tests.
//!
//! The central piece is [`MockGenerator`], a scriptable generator with
//! call recording, which is how orchestration gets tested without ever
//! spawning a process. Preset tool caches keep availability lookups
//! hermetic - no test here depends on what happens to be on the PATH.
//!
//! # Example
//!
//! ```rust,ignore
//! use purser::test_support::{all_missing_cache, MockGenerator};
//!
//! #[test]
//! fn test_example() {
//!     let failing = MockGenerator::new("flaky", 10).failing("tool exploded");
//!     let calls = failing.call_counter();
//!
//!     let mut registry = GeneratorRegistry::new(all_missing_cache());
//!     registry.register(Box::new(failing));
//!
//!     // ... run orchestration, then assert on calls.count()
//! }
//! ```

pub mod fixtures;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::generator::capability::{FormatCapability, SbomFormat};
use crate::generator::request::GenerationRequest;
use crate::generator::result::GenerationResult;
use crate::generator::trait_def::{GenerateContext, SbomGenerator};
use crate::tools::{ExternalTool, ToolAvailability, ToolCache};

// Re-export fixtures for convenience
pub use fixtures::*;

/// Shared call counter, cloned out of a mock before it is boxed.
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    /// Number of `generate` calls recorded so far.
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn increment(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

/// What a mock generator does when `generate` is called.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Return a success result pointing at the request's output path.
    Succeed,
    /// Return a failure result with this message.
    Fail(String),
    /// Return `Err`, as a misbehaving implementation would.
    Error(String),
    /// Panic with this message.
    Panic(String),
}

/// Scriptable generator for registry and ops tests.
///
/// Defaults to a succeeding CycloneDX 1.5/1.6 generator backed by cdxgen;
/// every dimension can be overridden through the builder methods.
pub struct MockGenerator {
    name: &'static str,
    priority: u32,
    tool: ExternalTool,
    capabilities: Vec<FormatCapability>,
    supports: bool,
    outcome: MockOutcome,
    calls: CallCounter,
}

impl MockGenerator {
    /// Create a succeeding mock with the given name and priority.
    pub fn new(name: &'static str, priority: u32) -> Self {
        let capability = FormatCapability::new(SbomFormat::CycloneDx, &["1.5", "1.6"], "1.6")
            .expect("static capability is well-formed");

        MockGenerator {
            name,
            priority,
            tool: ExternalTool::Cdxgen,
            capabilities: vec![capability],
            supports: true,
            outcome: MockOutcome::Succeed,
            calls: CallCounter::default(),
        }
    }

    /// Replace the declared capabilities.
    pub fn with_capabilities(mut self, capabilities: Vec<FormatCapability>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Script the `supports` predicate.
    pub fn with_supports(mut self, supports: bool) -> Self {
        self.supports = supports;
        self
    }

    /// Set the tool this mock claims to drive.
    pub fn with_tool(mut self, tool: ExternalTool) -> Self {
        self.tool = tool;
        self
    }

    /// Make `generate` return a failure result.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.outcome = MockOutcome::Fail(message.into());
        self
    }

    /// Make `generate` return `Err`.
    pub fn erroring(mut self, message: impl Into<String>) -> Self {
        self.outcome = MockOutcome::Error(message.into());
        self
    }

    /// Make `generate` panic.
    pub fn panicking(mut self, message: impl Into<String>) -> Self {
        self.outcome = MockOutcome::Panic(message.into());
        self
    }

    /// A handle observing this mock's `generate` call count.
    pub fn call_counter(&self) -> CallCounter {
        self.calls.clone()
    }

    fn resolved_version(&self, request: &GenerationRequest) -> String {
        if let Some(version) = request.spec_version() {
            return version.to_string();
        }
        self.capability_for(request.format())
            .map(|cap| cap.default_version().to_string())
            .unwrap_or_else(|| "default".to_string())
    }
}

impl SbomGenerator for MockGenerator {
    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> u32 {
        self.priority
    }

    fn tool(&self) -> ExternalTool {
        self.tool
    }

    fn capabilities(&self) -> &[FormatCapability] {
        &self.capabilities
    }

    fn supports(&self, _request: &GenerationRequest) -> bool {
        self.supports
    }

    fn generate(
        &self,
        request: &GenerationRequest,
        _ctx: &GenerateContext,
    ) -> Result<GenerationResult> {
        self.calls.increment();

        match &self.outcome {
            MockOutcome::Succeed => Ok(GenerationResult::success(
                self.name,
                request.format(),
                self.resolved_version(request),
                request.output_path(),
            )),
            MockOutcome::Fail(message) => Ok(GenerationResult::failure(
                self.name,
                request.format(),
                self.resolved_version(request),
                message.clone(),
            )),
            MockOutcome::Error(message) => Err(anyhow!("{}", message)),
            MockOutcome::Panic(message) => panic!("{}", message),
        }
    }
}

/// A cache with every tool preset missing. Never probes the real PATH.
pub fn all_missing_cache() -> Arc<ToolCache> {
    let cache = Arc::new(ToolCache::new());
    for tool in ExternalTool::ALL {
        cache.preset(tool, ToolAvailability::missing());
    }
    cache
}

/// A hermetic cache where exactly the listed tools are installed.
pub fn cache_with_installed(tools: &[ExternalTool]) -> Arc<ToolCache> {
    let cache = all_missing_cache();
    for tool in tools {
        cache.preset(
            *tool,
            ToolAvailability::installed(format!("/usr/bin/{}", tool.command())),
        );
    }
    cache
}

/// A hermetic cache where one tool resolves to the given path.
///
/// Pair with [`stub_tool`] to make an adapter spawn a stub.
pub fn cache_with_tool_at(
    tool: ExternalTool,
    path: impl Into<std::path::PathBuf>,
) -> Arc<ToolCache> {
    let cache = all_missing_cache();
    cache.preset(tool, ToolAvailability::installed(path.into()));
    cache
}

/// Write an executable shell stub that stands in for an external tool.
///
/// Adapter tests preset the cache with the stub's path so `generate`
/// spawns it instead of the real tool. The body runs under `sh` with the
/// tool's arguments in `$1..`.
pub fn stub_tool(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write stub tool");

    let mut perms = std::fs::metadata(&path).expect("stat stub tool").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod stub tool");

    path
}

/// Assertion helpers for testing.
pub mod assertions {
    use anyhow::Result;

    /// Assert that a result is Ok and return the value.
    pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
        match result {
            Ok(v) => v,
            Err(e) => panic!("expected Ok, got Err: {:?}", e),
        }
    }

    /// Assert that a result is Err and return the error.
    pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>) -> E {
        match result {
            Ok(v) => panic!("expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    }

    /// Assert that an error message contains a substring.
    pub fn assert_error_contains<T: std::fmt::Debug>(result: Result<T>, substring: &str) {
        match result {
            Ok(v) => panic!("expected Err containing '{}', got Ok: {:?}", substring, v),
            Err(e) => {
                let msg = format!("{:#}", e);
                assert!(
                    msg.contains(substring),
                    "error '{}' does not contain '{}'",
                    msg,
                    substring
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_generator_default_succeeds() {
        let mock = MockGenerator::new("mock", 10);
        let calls = mock.call_counter();

        let request =
            GenerationRequest::for_lock_file("Cargo.lock", SbomFormat::CycloneDx, "bom.json");
        let result = mock.generate(&request, &GenerateContext::new()).unwrap();

        assert!(result.is_success());
        assert_eq!(result.generator_name(), "mock");
        assert_eq!(result.spec_version(), "1.6");
        assert_eq!(calls.count(), 1);
    }

    #[test]
    fn test_mock_generator_uses_requested_version() {
        let mock = MockGenerator::new("mock", 10);

        let request =
            GenerationRequest::for_lock_file("Cargo.lock", SbomFormat::CycloneDx, "bom.json")
                .with_spec_version(Some("1.5".to_string()));
        let result = mock.generate(&request, &GenerateContext::new()).unwrap();

        assert_eq!(result.spec_version(), "1.5");
    }

    #[test]
    fn test_stub_tool_is_executable() {
        let tmp = tempfile::TempDir::new().unwrap();
        let stub = stub_tool(tmp.path(), "fake-syft", "echo stubbed");

        let output = std::process::Command::new(&stub).output().unwrap();
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("stubbed"));
    }

    #[test]
    fn test_mock_generator_failing() {
        let mock = MockGenerator::new("mock", 10).failing("scripted failure");

        let request =
            GenerationRequest::for_lock_file("Cargo.lock", SbomFormat::CycloneDx, "bom.json");
        let result = mock.generate(&request, &GenerateContext::new()).unwrap();

        assert!(!result.is_success());
        assert_eq!(result.error(), Some("scripted failure"));
    }

    #[test]
    fn test_mock_generator_erroring() {
        let mock = MockGenerator::new("mock", 10).erroring("scripted error");

        let request =
            GenerationRequest::for_lock_file("Cargo.lock", SbomFormat::CycloneDx, "bom.json");
        let err = mock.generate(&request, &GenerateContext::new()).unwrap_err();

        assert!(err.to_string().contains("scripted error"));
    }

    #[test]
    fn test_call_counter_shared_across_clones() {
        let mock = MockGenerator::new("mock", 10);
        let calls = mock.call_counter();
        assert_eq!(calls.count(), 0);

        let request =
            GenerationRequest::for_lock_file("Cargo.lock", SbomFormat::CycloneDx, "bom.json");
        let _ = mock.generate(&request, &GenerateContext::new());
        let _ = mock.generate(&request, &GenerateContext::new());

        assert_eq!(calls.count(), 2);
    }

    #[test]
    fn test_preset_caches_are_hermetic() {
        let missing = all_missing_cache();
        for tool in ExternalTool::ALL {
            assert!(!missing.is_installed(tool));
        }

        let partial = cache_with_installed(&[ExternalTool::Trivy]);
        assert!(partial.is_installed(ExternalTool::Trivy));
        assert!(!partial.is_installed(ExternalTool::Syft));
        assert_eq!(
            partial.path(ExternalTool::Trivy).unwrap(),
            std::path::PathBuf::from("/usr/bin/trivy")
        );
    }

    #[test]
    fn test_assertions() {
        use assertions::*;

        let ok_result: Result<i32, &str> = Ok(42);
        assert_eq!(assert_ok(ok_result), 42);

        let err_result: Result<i32, &str> = Err("error");
        assert_eq!(assert_err(err_result), "error");

        let failure: Result<()> = Err(anyhow!("disk on fire"));
        assert_error_contains(failure, "disk on fire");
    }
}
