// System endpoints: speed profiles, distribution boxes, and the
// availability report built on top of them.

use tracing::debug;

use crate::availability::calculate_odb_availability;
use crate::client::SmartOltClient;
use crate::error::Error;
use crate::models::{ListResponse, Odb, OdbAvailability, SpeedProfile};
use crate::transport::{ApiRequest, Transport};

impl<T: Transport> SmartOltClient<T> {
    /// `GET /system/get_speed_profiles`
    pub async fn speed_profiles(&self) -> Result<Vec<SpeedProfile>, Error> {
        let url = self.endpoint("/system/get_speed_profiles", &[])?;
        debug!("listing speed profiles");
        let resp: ListResponse<SpeedProfile> = self.execute(ApiRequest::get(url)).await?;
        Ok(resp.response)
    }

    /// `GET /system/get_odbs`
    pub async fn odbs(&self) -> Result<Vec<Odb>, Error> {
        let url = self.endpoint("/system/get_odbs", &[])?;
        debug!("listing ODBs");
        let resp: ListResponse<Odb> = self.execute(ApiRequest::get(url)).await?;
        Ok(resp.response)
    }

    /// Port usage for every distribution box.
    ///
    /// Fetches boxes and ONUs concurrently; either failing fails the report.
    pub async fn odb_availability(&self) -> Result<Vec<OdbAvailability>, Error> {
        let (odbs, onus) = tokio::try_join!(self.odbs(), self.all_onus())?;
        debug!(odbs = odbs.len(), onus = onus.len(), "computing ODB availability");
        Ok(calculate_odb_availability(&odbs, &onus))
    }
}
