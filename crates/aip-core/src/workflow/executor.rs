//! Workflow interpreter — walks a manifest's steps in order.
//!
//! For every step the interpreter:
//! 1. Resolves the step's agent (an unknown id aborts the whole run)
//! 2. Prints the step header
//! 3. Calls the agent's first MCP tool through the [`ToolClient`], if any
//! 4. Produces a deterministic demo response in place of a model call
//! 5. Appends tool results and responses to the running transcript
//!
//! Nothing here exits the process; fatal conditions come back as [`AipError`].

use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write;

use crate::error::AipError;
use crate::i18n::Catalog;
use crate::mcp::{McpConfig, ToolClient};
use crate::t;
use crate::workflow::schema::{AgentDef, Manifest, McpBinding, ToolBinding};

/// Prefix applied to tool results and demo responses in the console trace.
const INDENT: &str = "   ";

/// Agent id → that agent's most recent demo response.
pub type LastResponses = HashMap<String, String>;

/// Accumulated record of every tool result and agent response in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    text: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_tool_result(&mut self, agent_name: &str, result: &str) {
        let _ = write!(self.text, "\n\n### MCP RESULT ({})\n{}", agent_name, result);
    }

    pub fn push_response(&mut self, agent_name: &str, response: &str) {
        let _ = write!(self.text, "\n\n### {} RESPONSE\n{}", agent_name, response);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The transcript without the leading separator.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Derived state of one run.
#[derive(Debug, Clone, Default)]
pub struct RunState {
    pub transcript: Transcript,
    pub last_responses: LastResponses,
    pub steps_executed: usize,
}

/// The demo response standing in for a model call.
pub fn demo_answer(agent: &AgentDef, task: &str) -> String {
    format!("[demo] {} → {}", agent.name, task)
}

/// Runs manifests against a tool client, writing the trace to an output sink.
pub struct WorkflowInterpreter<'a> {
    catalog: &'a Catalog,
    client: &'a dyn ToolClient,
    /// Present when MCP mode is enabled
    mcp_config: Option<&'a McpConfig>,
}

impl<'a> WorkflowInterpreter<'a> {
    pub fn new(catalog: &'a Catalog, client: &'a dyn ToolClient) -> Self {
        Self {
            catalog,
            client,
            mcp_config: None,
        }
    }

    /// Enable MCP mode: steps with MCP tools also report the server configuration.
    pub fn with_mcp_config(mut self, config: &'a McpConfig) -> Self {
        self.mcp_config = Some(config);
        self
    }

    /// Execute every step of `manifest` in order.
    pub fn interpret<W: Write>(&self, manifest: &Manifest, out: &mut W) -> Result<RunState, AipError> {
        let mut state = RunState::default();
        let steps = manifest.steps();

        if steps.is_empty() {
            writeln!(out, "{}", t!(self.catalog, "no_steps"))?;
            return Ok(state);
        }

        // Later declarations of a duplicated id replace earlier ones.
        let agents: HashMap<&str, &AgentDef> = manifest
            .agents
            .iter()
            .map(|agent| (agent.id.as_str(), agent))
            .collect();

        for (i, step) in steps.iter().enumerate() {
            let index = i + 1;
            let agent = agents
                .get(step.agent.as_str())
                .copied()
                .ok_or_else(|| AipError::UnknownAgent {
                    index,
                    agent_id: step.agent.clone(),
                })?;

            tracing::debug!(
                "[Workflow] Step {}/{}: agent '{}' ({})",
                index,
                steps.len(),
                agent.id,
                agent.role.as_deref().unwrap_or("no role")
            );
            writeln!(
                out,
                "{}",
                t!(
                    self.catalog,
                    "step_header",
                    index = index,
                    agent_name = agent.name,
                    task = step.task
                )
            )?;

            let target = agent.mcp_tool().and_then(McpBinding::target);
            if target.is_none() && !agent.tools.is_empty() {
                let providers: Vec<&str> = agent.tools.iter().map(ToolBinding::provider).collect();
                tracing::debug!(
                    "[Workflow] Agent '{}' has no callable MCP tool (providers: {})",
                    agent.id,
                    providers.join(", ")
                );
            }

            if let Some((server, tool, params)) = target {
                write_indented(out, &t!(self.catalog, "mcp_will_call", server = server, tool = tool))?;
                if let Some(config) = self.mcp_config {
                    match config.get(server) {
                        Some(descriptor) => tracing::debug!(
                            "[MCP] Server '{}' configured ({})",
                            server,
                            descriptor.transport.map_or_else(|| "no type".to_string(), |t| t.to_string())
                        ),
                        None => tracing::debug!("[MCP] Server '{}' not in config", server),
                    }
                    let notice = if config.is_empty() {
                        t!(self.catalog, "mcp_config_missing")
                    } else {
                        t!(self.catalog, "mcp_config_loaded", count = config.len())
                    };
                    write_indented(out, &notice)?;
                }

                let result = self.client.invoke(server, tool, params);
                write_indented(out, &result)?;
                state.transcript.push_tool_result(&agent.name, &result);
            }

            let answer = demo_answer(agent, &step.task);
            write_indented(out, &answer)?;
            state.transcript.push_response(&agent.name, &answer);
            state.last_responses.insert(agent.id.clone(), answer);
            state.steps_executed += 1;
        }

        tracing::debug!("[Workflow] Completed {} step(s)", state.steps_executed);
        Ok(state)
    }
}

/// Write `text` with every non-blank line prefixed by [`INDENT`].
fn write_indented<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    for line in text.lines() {
        if line.trim().is_empty() {
            writeln!(out, "{}", line)?;
        } else {
            writeln!(out, "{}{}", INDENT, line)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use serde_json::{json, Map, Value};

    use crate::i18n::Locale;
    use crate::mcp::StubToolClient;

    /// Records every invocation and answers with a fixed marker.
    #[derive(Default)]
    struct RecordingClient {
        calls: RefCell<Vec<(String, String, Map<String, Value>)>>,
    }

    impl ToolClient for RecordingClient {
        fn invoke(&self, server: &str, tool: &str, params: &Map<String, Value>) -> String {
            self.calls
                .borrow_mut()
                .push((server.to_string(), tool.to_string(), params.clone()));
            format!("result:{}/{}", server, tool)
        }
    }

    fn manifest(value: Value) -> Manifest {
        Manifest::from_value(value).unwrap()
    }

    fn run(m: &Manifest, client: &dyn ToolClient) -> (Result<RunState, AipError>, String) {
        let catalog = Catalog::builtin(Locale::En);
        let mut out = Vec::new();
        let result = WorkflowInterpreter::new(&catalog, client).interpret(m, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_single_step_without_tools() {
        let m = manifest(json!({
            "agents": [{ "id": "w", "name": "Writer" }],
            "workflow": { "steps": [{ "agent": "w", "task": "Draft" }] }
        }));
        let client = RecordingClient::default();
        let (result, output) = run(&m, &client);
        let state = result.unwrap();

        assert_eq!(state.steps_executed, 1);
        assert_eq!(state.transcript.as_str(), "\n\n### Writer RESPONSE\n[demo] Writer → Draft");
        assert_eq!(state.last_responses.len(), 1);
        assert_eq!(state.last_responses["w"], "[demo] Writer → Draft");
        assert!(client.calls.borrow().is_empty());
        assert_eq!(output, "— Step 1: Writer → Draft\n   [demo] Writer → Draft\n");
    }

    #[test]
    fn test_steps_run_in_order_and_last_response_wins() {
        let m = manifest(json!({
            "agents": [
                { "id": "a", "name": "Alpha" },
                { "id": "b", "name": "Beta" },
                { "id": "unused", "name": "Idle" }
            ],
            "workflow": { "steps": [
                { "agent": "a", "task": "one" },
                { "agent": "b", "task": "two" },
                { "agent": "a", "task": "three" }
            ] }
        }));
        let (result, output) = run(&m, &StubToolClient);
        let state = result.unwrap();

        assert_eq!(state.steps_executed, 3);
        let mut keys: Vec<_> = state.last_responses.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(state.last_responses["a"], "[demo] Alpha → three");

        let one = output.find("Step 1").unwrap();
        let two = output.find("Step 2").unwrap();
        let three = output.find("Step 3").unwrap();
        assert!(one < two && two < three);
    }

    #[test]
    fn test_unknown_agent_aborts_at_step() {
        let m = manifest(json!({
            "agents": [{ "id": "a", "name": "Alpha" }],
            "workflow": { "steps": [
                { "agent": "a", "task": "first" },
                { "agent": "ghost", "task": "boo" },
                { "agent": "a", "task": "never" }
            ] }
        }));
        let (result, output) = run(&m, &StubToolClient);

        match result.unwrap_err() {
            AipError::UnknownAgent { index, agent_id } => {
                assert_eq!(index, 2);
                assert_eq!(agent_id, "ghost");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(output.contains("first"));
        assert!(!output.contains("boo"));
        assert!(!output.contains("never"));
    }

    #[test]
    fn test_mcp_tool_invoked_once_per_visit() {
        let m = manifest(json!({
            "agents": [{
                "id": "r",
                "name": "Researcher",
                "tools": [
                    { "provider": "http" },
                    { "provider": "mcp", "x-mcp": { "server": "search", "tool": "web", "params": { "q": "rust", "n": 3 } } }
                ]
            }],
            "workflow": { "steps": [
                { "agent": "r", "task": "look" },
                { "agent": "r", "task": "look again" }
            ] }
        }));
        let client = RecordingClient::default();
        let (result, output) = run(&m, &client);
        let state = result.unwrap();

        let calls = client.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "search");
        assert_eq!(calls[0].1, "web");
        assert_eq!(Value::Object(calls[0].2.clone()), json!({ "q": "rust", "n": 3 }));

        assert!(state
            .transcript
            .as_str()
            .starts_with("\n\n### MCP RESULT (Researcher)\nresult:search/web\n\n### Researcher RESPONSE\n"));
        assert!(output.contains("   🔌 MCP call: server=search, tool=web\n   result:search/web\n"));
        // No configuration notice outside MCP mode.
        assert!(!output.contains("MCP config"));
    }

    #[test]
    fn test_mcp_params_default_to_empty() {
        let m = manifest(json!({
            "agents": [{ "id": "r", "name": "R", "tools": [{ "provider": "mcp", "x-mcp": { "server": "s", "tool": "t" } }] }],
            "workflow": { "steps": [{ "agent": "r", "task": "x" }] }
        }));
        let client = RecordingClient::default();
        run(&m, &client).0.unwrap();
        assert!(client.calls.borrow()[0].2.is_empty());
    }

    #[test]
    fn test_incomplete_mcp_binding_is_skipped() {
        let m = manifest(json!({
            "agents": [{ "id": "r", "name": "R", "tools": [
                { "provider": "mcp", "x-mcp": { "server": "s" } },
                { "provider": "mcp", "x-mcp": { "server": "other", "tool": "t" } }
            ] }],
            "workflow": { "steps": [{ "agent": "r", "task": "x" }] }
        }));
        let client = RecordingClient::default();
        let state = run(&m, &client).0.unwrap();

        // Only the first MCP binding is considered, and it has no tool.
        assert!(client.calls.borrow().is_empty());
        assert_eq!(state.transcript.as_str(), "\n\n### R RESPONSE\n[demo] R → x");
    }

    #[test]
    fn test_non_mcp_tools_never_invoke_client() {
        let m = manifest(json!({
            "agents": [{ "id": "r", "name": "R", "tools": [{ "provider": "openai" }, { "provider": "local" }] }],
            "workflow": { "steps": [{ "agent": "r", "task": "x" }] }
        }));
        let client = RecordingClient::default();
        let state = run(&m, &client).0.unwrap();
        assert!(client.calls.borrow().is_empty());
        assert!(!state.transcript.as_str().contains("MCP RESULT"));
    }

    #[test]
    fn test_mcp_mode_reports_config() {
        let m = manifest(json!({
            "agents": [{ "id": "r", "name": "R", "tools": [{ "provider": "mcp", "x-mcp": { "server": "s", "tool": "t" } }] }],
            "workflow": { "steps": [{ "agent": "r", "task": "x" }] }
        }));
        let catalog = Catalog::builtin(Locale::En);

        let empty = McpConfig::empty();
        let mut out = Vec::new();
        WorkflowInterpreter::new(&catalog, &StubToolClient)
            .with_mcp_config(&empty)
            .interpret(&m, &mut out)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("MCP config not found"));

        let loaded = McpConfig::parse(r#"{"s": {"type": "stdio", "command": "srv"}}"#);
        let mut out = Vec::new();
        WorkflowInterpreter::new(&catalog, &StubToolClient)
            .with_mcp_config(&loaded)
            .interpret(&m, &mut out)
            .unwrap();
        assert!(String::from_utf8(out).unwrap().contains("   MCP config loaded: 1 server(s)\n"));
    }

    #[test]
    fn test_zero_steps_prints_notice() {
        let m = manifest(json!({ "agents": [], "workflow": { "steps": [] } }));
        let (result, output) = run(&m, &StubToolClient);
        let state = result.unwrap();
        assert_eq!(state.steps_executed, 0);
        assert!(state.transcript.is_empty());
        assert!(state.last_responses.is_empty());
        assert_eq!(output, "⚠️ The manifest has no workflow steps.\n");
    }

    #[test]
    fn test_write_indented_skips_blank_lines() {
        let mut out = Vec::new();
        write_indented(&mut out, "a\n\nb").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "   a\n\n   b\n");
    }
}
