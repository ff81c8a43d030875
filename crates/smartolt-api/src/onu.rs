// ONU endpoints
//
// Read paths (details, signal, list, statuses, unconfigured) and device
// actions (reboot, enable, disable, speed profile, authorize).

use chrono::{TimeDelta, Utc};
use tracing::debug;

use crate::client::SmartOltClient;
use crate::error::Error;
use crate::models::{
    AuthorizeOnu, ListResponse, OnuDetails, OnuListItem, OnuListResponse, OnuSignal, OnuStatus,
    UnconfiguredOnu,
};
use crate::reboot;
use crate::transport::{ApiRequest, FormBody, Transport};

/// OLT queried by [`SmartOltClient::onus_needing_reboot`].
pub const DEFAULT_OLT_ID: u32 = 1;

impl<T: Transport> SmartOltClient<T> {
    // ── Reads ────────────────────────────────────────────────────────

    /// `GET /onu/get_onu_details/{id}`
    pub async fn onu_details(&self, id: &str) -> Result<OnuDetails, Error> {
        let url = self.endpoint("/onu/get_onu_details", &[id])?;
        debug!(id, "fetching ONU details");
        self.execute(ApiRequest::get(url)).await
    }

    /// `GET /onu/get_onu_signal/{id}`
    pub async fn onu_signal(&self, id: &str) -> Result<OnuSignal, Error> {
        let url = self.endpoint("/onu/get_onu_signal", &[id])?;
        debug!(id, "fetching ONU signal");
        self.execute(ApiRequest::get(url)).await
    }

    /// `GET /onu/get_all_onus_details`
    pub async fn all_onus(&self) -> Result<Vec<OnuListItem>, Error> {
        let url = self.endpoint("/onu/get_all_onus_details", &[])?;
        debug!("listing ONUs");
        let resp: OnuListResponse = self.execute(ApiRequest::get(url)).await?;
        Ok(resp.onus)
    }

    /// `GET /onu/get_onu_statuses?olt_id={olt_id}`
    pub async fn onu_statuses(&self, olt_id: u32) -> Result<Vec<OnuStatus>, Error> {
        let mut url = self.endpoint("/onu/get_onu_statuses", &[])?;
        url.query_pairs_mut()
            .append_pair("olt_id", &olt_id.to_string());
        debug!(olt_id, "listing ONU statuses");
        let resp: ListResponse<OnuStatus> = self.execute(ApiRequest::get(url)).await?;
        Ok(resp.response)
    }

    /// `GET /onu/unconfigured_onus_for_olt/{olt_id}`
    pub async fn unconfigured_onus(&self, olt_id: u32) -> Result<Vec<UnconfiguredOnu>, Error> {
        let url = self.endpoint("/onu/unconfigured_onus_for_olt", &[&olt_id.to_string()])?;
        debug!(olt_id, "listing unconfigured ONUs");
        let resp: ListResponse<UnconfiguredOnu> = self.execute(ApiRequest::get(url)).await?;
        Ok(resp.response)
    }

    /// Ids of ONUs on OLT 1 that have been `Online` for more than 14 days.
    pub async fn onus_needing_reboot(&self) -> Result<Vec<String>, Error> {
        self.onus_online_longer_than(DEFAULT_OLT_ID, reboot::default_reboot_age())
            .await
    }

    /// Ids of ONUs on `olt_id` whose last status change to `Online` is
    /// older than `max_age`. See [`reboot::stale_online_onus`].
    pub async fn onus_online_longer_than(
        &self,
        olt_id: u32,
        max_age: TimeDelta,
    ) -> Result<Vec<String>, Error> {
        let statuses = self.onu_statuses(olt_id).await?;
        let ids = reboot::stale_online_onus(&statuses, Utc::now(), max_age);
        debug!(
            scanned = statuses.len(),
            selected = ids.len(),
            "reboot candidates"
        );
        Ok(ids)
    }

    // ── Actions ──────────────────────────────────────────────────────

    /// `POST /onu/reboot/{id}`
    pub async fn reboot_onu(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint("/onu/reboot", &[id])?;
        debug!(id, "rebooting ONU");
        self.execute_action(ApiRequest::post(url)).await
    }

    /// `POST /onu/disable/{id}`
    pub async fn disable_onu(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint("/onu/disable", &[id])?;
        debug!(id, "disabling ONU");
        self.execute_action(ApiRequest::post(url)).await
    }

    /// `POST /onu/enable/{id}`
    pub async fn enable_onu(&self, id: &str) -> Result<(), Error> {
        let url = self.endpoint("/onu/enable", &[id])?;
        debug!(id, "enabling ONU");
        self.execute_action(ApiRequest::post(url)).await
    }

    /// Assign upload and download speed profiles by name.
    ///
    /// `POST /onu/update_onu_speed_profiles/{id}`
    pub async fn update_speed_profile(
        &self,
        id: &str,
        download_profile: &str,
        upload_profile: &str,
    ) -> Result<(), Error> {
        let url = self.endpoint("/onu/update_onu_speed_profiles", &[id])?;
        debug!(id, download_profile, upload_profile, "updating speed profiles");
        let form = FormBody::new()
            .field("upload_speed_profile_name", upload_profile)
            .field("download_speed_profile_name", download_profile);
        self.execute_action(ApiRequest::post(url).with_form(form))
            .await
    }

    /// Authorize an ONU on a PON port.
    ///
    /// `POST /onu/authorize_onu`
    pub async fn authorize_onu(&self, request: &AuthorizeOnu) -> Result<(), Error> {
        let url = self.endpoint("/onu/authorize_onu", &[])?;
        debug!(sn = %request.sn, olt_id = %request.olt_id, "authorizing ONU");
        self.execute_action(ApiRequest::post(url).with_form(request.to_form()))
            .await
    }
}
