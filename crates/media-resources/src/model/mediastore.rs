//! MediaStore request shapes.

use resource_framework::target_shape;
use serde::Serialize;

target_shape! {
    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    pub struct DescribeContainerInput {
        pub container_name: Option<String>,
    }
}
