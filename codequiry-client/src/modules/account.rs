use std::sync::Arc;

use crate::connection::{Connection, Body, convert_api_output_obj};
use crate::models::account::Account as AccountModel;
use crate::types::Result;

use super::api_path;

const ACCOUNT_PATH: &str = "account";

/// Account API endpoints
pub struct Account {
    connection: Arc<Connection>,
}

impl Account {
    pub (crate) fn new(connection: Arc<Connection>) -> Self {
        Self { connection }
    }

    /// Return the account details and remaining quota of the api key in use
    pub async fn get(&self) -> Result<AccountModel> {
        let path = api_path!(ACCOUNT_PATH);
        self.connection.post(&path, Body::<()>::None, convert_api_output_obj).await
    }
}
