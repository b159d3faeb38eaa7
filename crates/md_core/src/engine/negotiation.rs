//! Opponent negotiation: friendly invites and public challenges.
//!
//! Both protocols converge on one acceptance routine. Binding `team_b_id`
//! and rejecting sibling pending requests happen under the match lane, so
//! of two concurrent accepts only the first to observe an unbound opponent
//! wins; the second fails exactly as a late sequential caller would.

use super::Engine;
use crate::error::{EngineError, Result};
use crate::models::{
    Match, MatchRequest, MatchStatus, MatchType, NotificationKind, NotificationPayload,
    RequestDirection, RequestStatus,
};

impl Engine {
    /// Friendly match: the creator invites a specific opponent team.
    pub fn invite_team(&self, caller_id: &str, match_id: &str, team_id: &str) -> Result<MatchRequest> {
        let lane = self.lane(match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let m = self.must_match(match_id)?;
        if m.match_type != MatchType::Friendly {
            return Err(EngineError::WrongMatchType { expected: "friendly" });
        }
        if m.status.is_terminal() {
            return Err(EngineError::WrongStatus { found: m.status });
        }
        if m.team_b_id.is_some() {
            return Err(EngineError::OpponentAlreadyConfirmed);
        }
        self.must_captain(&m.team_a_id, caller_id, "invite a team")?;

        let invited = self.must_team(team_id)?;
        if invited.id == m.team_a_id {
            return Err(EngineError::OwnTeamChallenge);
        }
        let exists = self
            .store()
            .requests_for_match(match_id)?
            .iter()
            .any(|r| r.is_pending() && r.team_id == invited.id);
        if exists {
            return Err(EngineError::PendingInviteExists);
        }

        let request = self.store().insert_request(MatchRequest::new(
            match_id,
            &invited.id,
            RequestDirection::Invite,
        ))?;

        self.notify(
            &invited.captain_id,
            NotificationKind::FriendlyInvite,
            NotificationPayload::for_match(match_id)
                .with_message("Friendly Match Invitation"),
        );
        Ok(request)
    }

    /// Public match: another team's captain challenges the creator.
    pub fn request_to_play(
        &self,
        caller_id: &str,
        match_id: &str,
        team_id: &str,
    ) -> Result<MatchRequest> {
        let lane = self.lane(match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let m = self.must_match(match_id)?;
        if m.match_type != MatchType::Public {
            return Err(EngineError::WrongMatchType { expected: "public" });
        }
        if m.status.is_terminal() {
            return Err(EngineError::WrongStatus { found: m.status });
        }
        if m.team_b_id.is_some() {
            return Err(EngineError::OpponentAlreadyBound);
        }
        let challenger = self.must_captain(team_id, caller_id, "request to play")?;
        if challenger.id == m.team_a_id {
            return Err(EngineError::OwnTeamChallenge);
        }
        let exists = self
            .store()
            .requests_for_match(match_id)?
            .iter()
            .any(|r| r.is_pending() && r.team_id == challenger.id);
        if exists {
            return Err(EngineError::RequestAlreadySent);
        }

        let request = self.store().insert_request(MatchRequest::new(
            match_id,
            &challenger.id,
            RequestDirection::Challenge,
        ))?;

        let creator_captain = self.must_team(&m.team_a_id)?.captain_id;
        self.notify(
            &creator_captain,
            NotificationKind::PlayRequest,
            NotificationPayload::for_match(match_id).with_message("New Challenge Request"),
        );
        Ok(request)
    }

    /// Accept an invite (invited captain) or a challenge (creating captain).
    ///
    /// Shared acceptance routine for both directions: binds the opponent,
    /// confirms the match, and auto-rejects every sibling pending request.
    pub fn accept_request(&self, caller_id: &str, request_id: &str) -> Result<Match> {
        let request = self.must_request(request_id)?;
        let lane = self.lane(&request.match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        // Re-read under the lane; a concurrent accept may have resolved it.
        let mut request = self.must_request(request_id)?;
        if !request.is_pending() {
            return Err(EngineError::RequestResolved);
        }
        let mut m = self.must_match(&request.match_id)?;
        if m.status.is_terminal() {
            return Err(EngineError::WrongStatus { found: m.status });
        }
        if m.team_b_id.is_some() {
            return Err(EngineError::OpponentAlreadyConfirmed);
        }
        self.authorize_resolution(&m, &request, caller_id, "accept this request")?;

        m.team_b_id = Some(request.team_id.clone());
        m.status = MatchStatus::Confirmed;
        let m = self.store().update_match(&m)?;

        request.status = RequestStatus::Accepted;
        self.store().update_request(&request)?;

        for mut sibling in self.store().requests_for_match(&m.id)? {
            if sibling.id != request.id && sibling.is_pending() {
                sibling.status = RequestStatus::Rejected;
                self.store().update_request(&sibling)?;
                let captain = self.must_team(&sibling.team_id)?.captain_id;
                self.notify(
                    &captain,
                    NotificationKind::PlayRequestDeclined,
                    NotificationPayload::for_match(&m.id)
                        .with_message("Another team was accepted for this match"),
                );
            }
        }

        match request.direction {
            RequestDirection::Challenge => {
                let challenger_captain = self.must_team(&request.team_id)?.captain_id;
                self.notify(
                    &challenger_captain,
                    NotificationKind::PlayRequestAccepted,
                    NotificationPayload::for_match(&m.id).with_message("Challenge Accepted!"),
                );
            }
            RequestDirection::Invite => {
                let creator_captain = self.must_team(&m.team_a_id)?.captain_id;
                self.notify(
                    &creator_captain,
                    NotificationKind::PlayRequestAccepted,
                    NotificationPayload::for_match(&m.id).with_message("Invitation accepted"),
                );
            }
        }

        log::info!("match {} confirmed against team {}", m.id, request.team_id);
        Ok(m)
    }

    /// Decline an invite or challenge. The counterparty is notified.
    pub fn decline_request(&self, caller_id: &str, request_id: &str) -> Result<MatchRequest> {
        let request = self.must_request(request_id)?;
        let lane = self.lane(&request.match_id);
        let _guard = lane.lock().expect("match lane poisoned");

        let mut request = self.must_request(request_id)?;
        if !request.is_pending() {
            return Err(EngineError::RequestResolved);
        }
        let m = self.must_match(&request.match_id)?;
        self.authorize_resolution(&m, &request, caller_id, "decline this request")?;

        request.status = RequestStatus::Rejected;
        let request = self.store().update_request(&request)?;

        let counterparty = match request.direction {
            // Creator learns the invited team turned them down
            RequestDirection::Invite => self.must_team(&m.team_a_id)?.captain_id,
            // Challenger learns the creator turned them down
            RequestDirection::Challenge => self.must_team(&request.team_id)?.captain_id,
        };
        self.notify(
            &counterparty,
            NotificationKind::PlayRequestDeclined,
            NotificationPayload::for_match(&m.id).with_message("Request declined"),
        );
        Ok(request)
    }

    fn must_request(&self, request_id: &str) -> Result<MatchRequest> {
        self.store().request_by_id(request_id)?.ok_or_else(|| EngineError::NotFound {
            entity: "match_request",
            id: request_id.to_string(),
        })
    }

    /// An invite is resolved by the invited team's captain; a challenge by
    /// the match creator's captain.
    fn authorize_resolution(
        &self,
        m: &Match,
        request: &MatchRequest,
        caller_id: &str,
        action: &'static str,
    ) -> Result<()> {
        let resolving_team = match request.direction {
            RequestDirection::Invite => &request.team_id,
            RequestDirection::Challenge => &m.team_a_id,
        };
        self.must_captain(resolving_team, caller_id, action)?;
        Ok(())
    }
}
