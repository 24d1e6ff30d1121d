use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::services::{SharedConfig, open_db, require_project_id};
use portfolio_core::{ProjectReactions, ReactionType, is_valid_project_id};
use portfolio_db::Db;

/// Reaction counts keyed by project id, then reaction type.
pub type ReactionsSummary = BTreeMap<String, BTreeMap<String, u64>>;

#[derive(Clone)]
pub struct ReactionsService {
    config: SharedConfig,
}

impl ReactionsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    pub fn parse_reaction(value: &str) -> Result<ReactionType> {
        value
            .parse::<ReactionType>()
            .map_err(|err| AppError::InvalidReaction(err.0))
    }

    /// Validation happens before the database is touched.
    pub fn add(&self, project_id: &str, reaction_type: &str) -> Result<(ReactionType, u64)> {
        require_project_id(project_id)?;
        let reaction = Self::parse_reaction(reaction_type)?;
        let db = self.db()?;
        Ok((reaction, db.add_reaction(project_id, reaction)?))
    }

    pub fn remove(&self, project_id: &str, reaction_type: &str) -> Result<(ReactionType, u64)> {
        require_project_id(project_id)?;
        let reaction = Self::parse_reaction(reaction_type)?;
        let db = self.db()?;
        Ok((reaction, db.remove_reaction(project_id, reaction)?))
    }

    pub fn list(&self, project_id: &str) -> Result<ProjectReactions> {
        if !is_valid_project_id(project_id) {
            return Ok(ProjectReactions::from_tallies(project_id, &[]));
        }
        let db = self.db()?;
        let tallies = db.project_reactions(project_id)?;
        Ok(ProjectReactions::from_tallies(project_id, &tallies))
    }

    pub fn summary(&self) -> Result<ReactionsSummary> {
        let db = self.db()?;
        let mut summary = ReactionsSummary::new();
        for tally in db.all_reactions()? {
            summary
                .entry(tally.project_id)
                .or_default()
                .insert(tally.reaction_type.to_string(), tally.count);
        }
        Ok(summary)
    }
}
