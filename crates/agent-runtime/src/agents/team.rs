//! Sequential team of agents
//!
//! A team hands the task to each member in turn. Every member sees the
//! coordinator brief, the original task, and what the members before it
//! produced; the last member's answer is the team's answer.

use agent_core::{Agent, Context, Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};

/// Members run in order, each building on the previous findings
///
/// # Example
///
/// ```no_run
/// use agent_core::{Agent, Context};
/// use agent_runtime::Team;
/// use std::sync::Arc;
///
/// # async fn example(collector: Arc<dyn Agent>, writer: Arc<dyn Agent>) -> agent_core::Result<()> {
/// let team = Team::builder("Research Team")
///     .instruction("Collect facts first, then write the report")
///     .add_member(collector)
///     .add_member(writer)
///     .build()?;
///
/// let mut context = Context::new();
/// let report = team.process("AAPL, MSFT".to_string(), &mut context).await?;
/// # Ok(())
/// # }
/// ```
pub struct Team {
    name: String,
    instructions: Vec<String>,
    members: Vec<Arc<dyn Agent>>,
}

impl Team {
    /// Create a new builder
    pub fn builder(name: impl Into<String>) -> TeamBuilder {
        TeamBuilder::new(name)
    }

    /// Number of members
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Member names in execution order
    pub fn member_names(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.name()).collect()
    }

    /// The prompt handed to `member` given the findings so far
    fn member_prompt(&self, member: &dyn Agent, task: &str, findings: &[(String, String)]) -> String {
        let mut prompt = format!("# Team: {}\n", self.name);
        if !self.instructions.is_empty() {
            prompt.push_str("\n## Coordinator brief\n");
            for instruction in &self.instructions {
                prompt.push_str(instruction);
                prompt.push('\n');
            }
        }
        if !member.role().is_empty() {
            prompt.push_str(&format!("\n## Your part\n{}\n", member.role()));
        }

        prompt.push_str(&format!("\n## Task\n{task}\n"));

        for (name, output) in findings {
            prompt.push_str(&format!("\n## Findings from {name}\n{output}\n"));
        }
        prompt
    }
}

#[async_trait]
impl Agent for Team {
    #[instrument(skip(self, input, context), fields(team = %self.name, members = self.members.len()))]
    async fn process(&self, input: String, context: &mut Context) -> Result<String> {
        context.set_task(input.clone());

        let mut findings: Vec<(String, String)> = Vec::with_capacity(self.members.len());
        for member in &self.members {
            info!(member = member.name(), "Handing task to member");
            let prompt = self.member_prompt(member.as_ref(), &input, &findings);

            let output = member
                .process(prompt, context)
                .await
                .map_err(|e| Error::MemberFailed {
                    member: member.name().to_string(),
                    reason: e.to_string(),
                })?;

            findings.push((member.name().to_string(), output));
        }

        findings
            .pop()
            .map(|(_, output)| output)
            .ok_or_else(|| Error::ProcessingFailed("Team has no members".to_string()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Builder for Team
pub struct TeamBuilder {
    name: String,
    instructions: Vec<String>,
    members: Vec<Arc<dyn Agent>>,
}

impl TeamBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instructions: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Add one coordinator instruction
    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instructions.push(instruction.into());
        self
    }

    /// Add several coordinator instructions
    pub fn instructions<I, S>(mut self, instructions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instructions.extend(instructions.into_iter().map(Into::into));
        self
    }

    /// Append a member; members run in the order they are added
    pub fn add_member(mut self, member: Arc<dyn Agent>) -> Self {
        self.members.push(member);
        self
    }

    /// Build the team
    ///
    /// # Errors
    ///
    /// Returns an error if no members were added
    pub fn build(self) -> Result<Team> {
        if self.members.is_empty() {
            return Err(Error::InitializationFailed(format!(
                "Team '{}' has no members",
                self.name
            )));
        }

        Ok(Team {
            name: self.name,
            instructions: self.instructions,
            members: self.members,
        })
    }
}
