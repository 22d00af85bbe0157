//! Commission handlers and dashboard reports.

mod reports;
mod update_status;

pub use reports::{AgentEarningsReportHandler, ListCommissionsHandler, PartnerRevenueReportHandler};
pub use update_status::{
    UpdateCommissionStatusCommand, UpdateCommissionStatusHandler, UpdateCommissionStatusResult,
};
