//! Auto-played encounters and their aggregate statistics

use anyhow::{bail, Context, Result};
use combat_core::combat::{Action, ActionResult, CombatSession};
use combat_core::registry::SessionRegistry;
use combat_core::skill::{Skill, SkillCatalog, SkillKind};
use combat_core::types::{CombatantSnapshot, MonsterRecord, Side};
use serde::Serialize;

/// Character actions allowed before an encounter is abandoned
const MAX_ACTIONS: u32 = 500;

/// Heal when health drops below this percentage
const HEAL_THRESHOLD_PCT: u32 = 40;

/// Outcome of one encounter
#[derive(Debug, Clone, Serialize)]
pub struct EncounterReport {
    pub monster: String,
    pub winner: Side,
    pub turns: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub healed: u32,
    pub crits: u32,
    pub skills_used: u32,
}

/// Totals across every encounter
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationSummary {
    pub encounters: u32,
    pub wins: u32,
    pub losses: u32,
    pub total_turns: u32,
    pub total_damage_dealt: u32,
    pub total_damage_taken: u32,
    pub crits: u32,
    pub skills_used: u32,
}

impl SimulationSummary {
    pub fn record(&mut self, report: &EncounterReport) {
        self.encounters += 1;
        match report.winner {
            Side::Character => self.wins += 1,
            Side::Monster => self.losses += 1,
        }
        self.total_turns += report.turns;
        self.total_damage_dealt += report.damage_dealt;
        self.total_damage_taken += report.damage_taken;
        self.crits += report.crits;
        self.skills_used += report.skills_used;
    }

    /// Win rate as a percentage
    pub fn win_rate(&self) -> f64 {
        if self.encounters > 0 {
            self.wins as f64 / self.encounters as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn avg_turns(&self) -> f64 {
        if self.encounters > 0 {
            self.total_turns as f64 / self.encounters as f64
        } else {
            0.0
        }
    }

    pub fn avg_damage_dealt(&self) -> f64 {
        if self.encounters > 0 {
            self.total_damage_dealt as f64 / self.encounters as f64
        } else {
            0.0
        }
    }
}

/// Fight one encounter to the end through the registry
///
/// The registry must run monster turns automatically.
pub fn run_encounter(
    registry: &mut SessionRegistry,
    character: &CombatantSnapshot,
    monster: &MonsterRecord,
) -> Result<EncounterReport> {
    let skills = registry.env().skills.clone();
    let started = registry
        .start(character.clone(), monster.clone())
        .with_context(|| format!("starting encounter against {}", monster.name))?;
    let handle = started.handle;
    let opening = started.state;

    let mut report = EncounterReport {
        monster: monster.name.clone(),
        winner: Side::Character,
        turns: opening.turn_number,
        damage_dealt: 0,
        damage_taken: started
            .monster_response
            .and_then(|response| response.damage)
            .unwrap_or(0),
        healed: 0,
        crits: 0,
        skills_used: 0,
    };

    let mut combat_over = opening.combat_over;
    let mut actions = 0;
    while !combat_over {
        actions += 1;
        if actions > MAX_ACTIONS {
            registry.abandon(handle)?;
            bail!("encounter against {} did not finish in {} actions", monster.name, MAX_ACTIONS);
        }

        let session = registry
            .session(handle)
            .context("session vanished mid-encounter")?;
        let action = choose_action(session, &skills);

        let outcome = registry.act(handle, action)?;
        tally(&mut report, &outcome.result);
        if let Some(response) = &outcome.monster_response {
            report.damage_taken += response.damage.unwrap_or(0);
        }
        report.turns = outcome.state.turn_number;
        combat_over = outcome.state.combat_over;
    }

    report.winner = registry.finish(handle)?;
    tracing::debug!(
        monster = %report.monster,
        winner = %report.winner,
        turns = report.turns,
        "encounter finished"
    );
    Ok(report)
}

fn tally(report: &mut EncounterReport, result: &ActionResult) {
    report.damage_dealt += result.total_damage();
    report.healed += result.heal.unwrap_or(0);
    if result.critical {
        report.crits += 1;
    }
    if result.skill_name.is_some() {
        report.skills_used += 1;
    }
}

/// Pick the character's next action
///
/// Heals when low, then prefers free follow-ups, then the most expensive
/// affordable attack, falling back to a basic attack. Skills with no cost
/// at all are never picked, so a basic attack keeps earning tactics.
pub fn choose_action(session: &CombatSession, skills: &SkillCatalog) -> Action {
    let usable = |skill: &Skill| {
        let has_cost = skill.mana_cost > 0 || !skill.tactics_cost.is_empty();
        has_cost
            && session.character().knows(&skill.id)
            && skill.mana_cost <= session.character_mana().current()
            && session.tactics().first_shortfall(&skill.tactics_cost).is_none()
    };

    let health = session.character_health();
    if health.current() * 100 < health.max() * HEAL_THRESHOLD_PCT {
        if let Some(heal) = skills
            .iter()
            .filter(|skill| skill.kind == SkillKind::Heal && usable(*skill))
            .max_by_key(|skill| skill.consumes_turn)
        {
            return Action::Skill(heal.id.clone());
        }
    }

    skills
        .iter()
        .filter(|skill| skill.is_offensive() && usable(*skill))
        .max_by_key(|skill| (!skill.consumes_turn, skill.mana_cost))
        .map(|skill| Action::Skill(skill.id.clone()))
        .unwrap_or(Action::Basic)
}
