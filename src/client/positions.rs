use crate::model::{
    auth::Acknowledgement,
    position::{NewPosition, Position},
    ApiId,
};

use super::{ApiClient, Result};

impl ApiClient {
    pub async fn positions(&self) -> Result<Vec<Position>> {
        self.get("/positions").await
    }

    pub async fn create_position(&self, position: &NewPosition) -> Result<Position> {
        self.post("/positions", position).await
    }

    pub async fn delete_position(&self, id: &ApiId) -> Result<Acknowledgement> {
        self.delete(&format!("/positions/{id}")).await
    }
}
