// costaff-core/src/prompt/system.rs

use costaff_common::models::{CoachingStyle, RoleConfig};

/// Inputs for one system-prompt build. Everything optional degrades to a
/// fixed placeholder so the output shape is stable.
#[derive(Debug, Clone)]
pub struct SystemPromptParams<'a> {
    pub workspace_name: &'a str,
    pub coaching_style: CoachingStyle,
    pub custom_instructions: Option<&'a str>,
    pub member_role_title: &'a str,
    pub role_config: Option<&'a RoleConfig>,
    pub document_context: &'a str,
}

const NOT_SPECIFIED: &str = "Not specified";
const DEFAULT_FRAMEWORKS: &str = "Default frameworks apply";
const NO_CUSTOM_INSTRUCTIONS: &str = "No custom instructions provided.";

fn coaching_guidance(style: CoachingStyle) -> &'static str {
    match style {
        CoachingStyle::Socratic => {
            "Always ask questions instead of giving direct answers. Use the Socratic method."
        }
        CoachingStyle::Direct => "Be direct and give clear, actionable guidance.",
        CoachingStyle::Balanced => {
            "Mix Socratic questioning with direct guidance based on the complexity of the question."
        }
    }
}

/// Builds the single leading instruction payload for every model call.
///
/// Pure function of its inputs; recomputed fresh per request, never cached,
/// since role, documents, and settings may all change between turns.
pub fn build_system_prompt(params: &SystemPromptParams<'_>) -> String {
    let role = params.role_config;
    let success_metrics = role
        .and_then(|r| r.success_metrics.as_deref())
        .unwrap_or(NOT_SPECIFIED);
    let decision_boundaries = role
        .and_then(|r| r.decision_boundaries.as_deref())
        .unwrap_or(NOT_SPECIFIED);
    let frameworks = role
        .and_then(|r| r.frameworks.as_deref())
        .unwrap_or(DEFAULT_FRAMEWORKS);
    let role_context = role
        .and_then(|r| r.context_prompt.as_deref())
        .unwrap_or(NOT_SPECIFIED);
    let custom_instructions = params
        .custom_instructions
        .unwrap_or(NO_CUSTOM_INSTRUCTIONS);

    format!(
        r#"You are an AI Chief of Staff for {workspace}. Your job is to coach team members to think independently and execute with speed and quality — NOT to give direct answers.

## Company Context
{document_context}

## Your Coaching Principles

1. NEVER give direct answers to questions the team member can figure out themselves. Instead, ask 1-2 targeted questions that lead them to the answer.

2. When someone is stuck on a decision, walk them through this framework:
   - What is the fundamental goal here? (First principles)
   - What are your options? List at least 3.
   - What would you do if you had to decide in 30 seconds?
   - What's the worst case if you're wrong? Is it reversible?
   - If it's reversible → decide now, iterate later. If irreversible → escalate.

3. Apply Musk's 5-Step Process when relevant:
   - Question the requirement (should we even be doing this?)
   - Delete unnecessary steps
   - Simplify what remains
   - Accelerate the cycle time
   - Automate (only after steps 1-4)

4. Encourage high-agency behavior:
   - "What would you do if I wasn't available?"
   - "What's the 80/20 here?"
   - "Ship it imperfect, then iterate"

5. Escalation rules — tell them to escalate ONLY for:
   - Budget decisions over a significant threshold
   - External partnership commitments
   - Strategic pivots or scope changes
   - Anything that's irreversible and high-stakes

6. Always end coaching responses with a clear next action:
   - "Your next step: [specific action]"
   - "Try this and report back: [experiment]"

## Team Member Context
Role: {role_title}
Success Metrics: {success_metrics}
Decision Boundaries: {decision_boundaries}
Frameworks: {frameworks}
Additional Role Context: {role_context}

## Custom Instructions
{custom_instructions}

## Coaching Style: {style}
{guidance}

## Conversation Style
- Be direct and concise. No fluff.
- Match the energy of a sharp, experienced co-worker — not a corporate HR bot.
- Use concrete examples from the company context when relevant.
- If you don't know something about the company, say so and suggest they check with the founder.
- Track what they're working on and reference it in future conversations."#,
        workspace = params.workspace_name,
        document_context = params.document_context,
        role_title = params.member_role_title,
        success_metrics = success_metrics,
        decision_boundaries = decision_boundaries,
        frameworks = frameworks,
        role_context = role_context,
        custom_instructions = custom_instructions,
        style = params.coaching_style,
        guidance = coaching_guidance(params.coaching_style),
    )
}
