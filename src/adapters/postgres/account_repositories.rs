//! PostgreSQL implementations of the account repositories.
//!
//! Partners, referral agents and the links between them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    corrupt, db_error, insert_error, optional_user_id, parse_enum, percentage, require_row,
    timestamp, user_id,
};
use crate::domain::account::{
    AccountStatus, PartnerAccount, PartnerProfile, ReferralAgent, ReferralCode, ReferralLink,
    ReferralLinkStatus,
};
use crate::domain::foundation::{
    AgentId, DomainError, PartnerId, ReferralLinkId, Timestamp, UserId,
};
use crate::ports::{AgentRepository, PartnerRepository, ReferralLinkRepository};

// ════════════════════════════════════════════════════════════════════════════════
// Partners
// ════════════════════════════════════════════════════════════════════════════════

const PARTNER_COLUMNS: &str = "id, user_id, business_name, location, bio, show_contact_info, \
     phone, whatsapp, status, reviewed_by, reviewed_at, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresPartnerRepository {
    pool: PgPool,
}

impl PostgresPartnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PartnerRow {
    id: Uuid,
    user_id: String,
    business_name: String,
    location: String,
    bio: Option<String>,
    show_contact_info: bool,
    phone: Option<String>,
    whatsapp: Option<String>,
    status: String,
    reviewed_by: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PartnerRow> for PartnerAccount {
    type Error = DomainError;

    fn try_from(row: PartnerRow) -> Result<Self, Self::Error> {
        Ok(PartnerAccount {
            id: PartnerId::from_uuid(row.id),
            user_id: user_id("user_id", row.user_id)?,
            profile: PartnerProfile {
                business_name: row.business_name,
                location: row.location,
                bio: row.bio,
                show_contact_info: row.show_contact_info,
                phone: row.phone,
                whatsapp: row.whatsapp,
            },
            status: parse_enum("status", &row.status, AccountStatus::parse)?,
            reviewed_by: optional_user_id("reviewed_by", row.reviewed_by)?,
            reviewed_at: timestamp(row.reviewed_at),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl PartnerRepository for PostgresPartnerRepository {
    async fn save(&self, partner: &PartnerAccount) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO partners (
                id, user_id, business_name, location, bio, show_contact_info,
                phone, whatsapp, status, reviewed_by, reviewed_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(partner.id.as_uuid())
        .bind(partner.user_id.as_str())
        .bind(&partner.profile.business_name)
        .bind(&partner.profile.location)
        .bind(&partner.profile.bio)
        .bind(partner.profile.show_contact_info)
        .bind(&partner.profile.phone)
        .bind(&partner.profile.whatsapp)
        .bind(partner.status.as_str())
        .bind(partner.reviewed_by.as_ref().map(UserId::as_str))
        .bind(partner.reviewed_at.as_ref().map(Timestamp::as_datetime))
        .bind(partner.created_at.as_datetime())
        .bind(partner.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(insert_error("insert partner", "A partner account already exists"))?;
        Ok(())
    }

    async fn update(&self, partner: &PartnerAccount) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE partners SET
                business_name = $2,
                location = $3,
                bio = $4,
                show_contact_info = $5,
                phone = $6,
                whatsapp = $7,
                status = $8,
                reviewed_by = $9,
                reviewed_at = $10,
                updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(partner.id.as_uuid())
        .bind(&partner.profile.business_name)
        .bind(&partner.profile.location)
        .bind(&partner.profile.bio)
        .bind(partner.profile.show_contact_info)
        .bind(&partner.profile.phone)
        .bind(&partner.profile.whatsapp)
        .bind(partner.status.as_str())
        .bind(partner.reviewed_by.as_ref().map(UserId::as_str))
        .bind(partner.reviewed_at.as_ref().map(Timestamp::as_datetime))
        .bind(partner.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update partner"))?;
        require_row(result, "Partner", partner.id)
    }

    async fn find_by_id(&self, id: &PartnerId) -> Result<Option<PartnerAccount>, DomainError> {
        let row: Option<PartnerRow> =
            sqlx::query_as(&format!("SELECT {} FROM partners WHERE id = $1", PARTNER_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("fetch partner"))?;
        row.map(PartnerAccount::try_from).transpose()
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PartnerAccount>, DomainError> {
        let row: Option<PartnerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM partners WHERE user_id = $1",
            PARTNER_COLUMNS
        ))
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch partner by user"))?;
        row.map(PartnerAccount::try_from).transpose()
    }

    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<PartnerAccount>, DomainError> {
        let rows: Vec<PartnerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM partners WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY created_at DESC",
            PARTNER_COLUMNS
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list partners"))?;
        rows.into_iter().map(PartnerAccount::try_from).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Referral agents
// ════════════════════════════════════════════════════════════════════════════════

const AGENT_COLUMNS: &str = "id, user_id, full_name, referral_code, commission_rate, \
     payout_details, status, reviewed_by, reviewed_at, created_at, updated_at";

#[derive(Clone)]
pub struct PostgresAgentRepository {
    pool: PgPool,
}

impl PostgresAgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_where(
        &self,
        clause: &str,
        value: &str,
    ) -> Result<Option<ReferralAgent>, DomainError> {
        let row: Option<AgentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM referral_agents WHERE {} = $1",
            AGENT_COLUMNS, clause
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch referral agent"))?;
        row.map(ReferralAgent::try_from).transpose()
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AgentRow {
    id: Uuid,
    user_id: String,
    full_name: String,
    referral_code: String,
    commission_rate: i16,
    payout_details: Option<String>,
    status: String,
    reviewed_by: Option<String>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AgentRow> for ReferralAgent {
    type Error = DomainError;

    fn try_from(row: AgentRow) -> Result<Self, Self::Error> {
        let referral_code = ReferralCode::parse(&row.referral_code)
            .map_err(|_| corrupt("referral_code", &row.referral_code))?;
        Ok(ReferralAgent {
            id: AgentId::from_uuid(row.id),
            user_id: user_id("user_id", row.user_id)?,
            full_name: row.full_name,
            referral_code,
            commission_rate: percentage("commission_rate", row.commission_rate)?,
            payout_details: row.payout_details,
            status: parse_enum("status", &row.status, AccountStatus::parse)?,
            reviewed_by: optional_user_id("reviewed_by", row.reviewed_by)?,
            reviewed_at: timestamp(row.reviewed_at),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

#[async_trait]
impl AgentRepository for PostgresAgentRepository {
    async fn save(&self, agent: &ReferralAgent) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO referral_agents (
                id, user_id, full_name, referral_code, commission_rate, payout_details,
                status, reviewed_by, reviewed_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(agent.id.as_uuid())
        .bind(agent.user_id.as_str())
        .bind(&agent.full_name)
        .bind(agent.referral_code.as_str())
        .bind(i16::from(agent.commission_rate.value()))
        .bind(&agent.payout_details)
        .bind(agent.status.as_str())
        .bind(agent.reviewed_by.as_ref().map(UserId::as_str))
        .bind(agent.reviewed_at.as_ref().map(Timestamp::as_datetime))
        .bind(agent.created_at.as_datetime())
        .bind(agent.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(insert_error(
            "insert referral agent",
            "A referral agent with this account or code already exists",
        ))?;
        Ok(())
    }

    async fn update(&self, agent: &ReferralAgent) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE referral_agents SET
                full_name = $2,
                commission_rate = $3,
                payout_details = $4,
                status = $5,
                reviewed_by = $6,
                reviewed_at = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(agent.id.as_uuid())
        .bind(&agent.full_name)
        .bind(i16::from(agent.commission_rate.value()))
        .bind(&agent.payout_details)
        .bind(agent.status.as_str())
        .bind(agent.reviewed_by.as_ref().map(UserId::as_str))
        .bind(agent.reviewed_at.as_ref().map(Timestamp::as_datetime))
        .bind(agent.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update referral agent"))?;
        require_row(result, "Referral agent", agent.id)
    }

    async fn find_by_id(&self, id: &AgentId) -> Result<Option<ReferralAgent>, DomainError> {
        let row: Option<AgentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM referral_agents WHERE id = $1",
            AGENT_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch referral agent"))?;
        row.map(ReferralAgent::try_from).transpose()
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ReferralAgent>, DomainError> {
        self.fetch_one_where("user_id", user_id.as_str()).await
    }

    async fn find_by_referral_code(
        &self,
        code: &ReferralCode,
    ) -> Result<Option<ReferralAgent>, DomainError> {
        self.fetch_one_where("referral_code", code.as_str()).await
    }

    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<ReferralAgent>, DomainError> {
        let rows: Vec<AgentRow> = sqlx::query_as(&format!(
            "SELECT {} FROM referral_agents WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY created_at DESC",
            AGENT_COLUMNS
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list referral agents"))?;
        rows.into_iter().map(ReferralAgent::try_from).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Referral links
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct PostgresReferralLinkRepository {
    pool: PgPool,
}

impl PostgresReferralLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LinkRow {
    id: Uuid,
    partner_id: Uuid,
    agent_id: Uuid,
    referral_code: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<LinkRow> for ReferralLink {
    type Error = DomainError;

    fn try_from(row: LinkRow) -> Result<Self, Self::Error> {
        if row.status != ReferralLinkStatus::Active.as_str() {
            return Err(corrupt("status", row.status));
        }
        let referral_code = ReferralCode::parse(&row.referral_code)
            .map_err(|_| corrupt("referral_code", &row.referral_code))?;
        Ok(ReferralLink {
            id: ReferralLinkId::from_uuid(row.id),
            partner_id: PartnerId::from_uuid(row.partner_id),
            agent_id: AgentId::from_uuid(row.agent_id),
            referral_code,
            status: ReferralLinkStatus::Active,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl ReferralLinkRepository for PostgresReferralLinkRepository {
    async fn save(&self, link: &ReferralLink) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO referral_links (id, partner_id, agent_id, referral_code, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(link.id.as_uuid())
        .bind(link.partner_id.as_uuid())
        .bind(link.agent_id.as_uuid())
        .bind(link.referral_code.as_str())
        .bind(link.status.as_str())
        .bind(link.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(insert_error("insert referral link", "Partner is already linked to an agent"))?;
        Ok(())
    }

    async fn find_by_partner(
        &self,
        partner_id: &PartnerId,
    ) -> Result<Option<ReferralLink>, DomainError> {
        let row: Option<LinkRow> = sqlx::query_as(
            r#"
            SELECT id, partner_id, agent_id, referral_code, status, created_at
            FROM referral_links
            WHERE partner_id = $1
            "#,
        )
        .bind(partner_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("fetch referral link"))?;
        row.map(ReferralLink::try_from).transpose()
    }

    async fn list_by_agent(&self, agent_id: &AgentId) -> Result<Vec<ReferralLink>, DomainError> {
        let rows: Vec<LinkRow> = sqlx::query_as(
            r#"
            SELECT id, partner_id, agent_id, referral_code, status, created_at
            FROM referral_links
            WHERE agent_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(agent_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list referral links"))?;
        rows.into_iter().map(ReferralLink::try_from).collect()
    }
}
