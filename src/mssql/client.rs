//! SQL Server connection handling

use tiberius::{Client, Config};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::error::SchemaAnalysisError;

/// Type alias for the SQL client
pub type SqlClient = Client<Compat<TcpStream>>;

/// Open a connection from an ADO-style connection string
/// (`Server=tcp:host,1433;Database=...;User Id=...;Password=...`).
///
/// The caller owns the returned client; dropping it releases the connection.
pub async fn connect(connection_string: &str) -> Result<SqlClient, SchemaAnalysisError> {
    let config = Config::from_ado_string(connection_string)
        .map_err(|source| SchemaAnalysisError::InvalidConnectionString { source })?;

    let tcp = TcpStream::connect(config.get_addr())
        .await
        .map_err(|source| SchemaAnalysisError::ConnectionFailed {
            source: source.into(),
        })?;
    tcp.set_nodelay(true)
        .map_err(|source| SchemaAnalysisError::ConnectionFailed {
            source: source.into(),
        })?;

    let client = Client::connect(config, tcp.compat_write())
        .await
        .map_err(|source| SchemaAnalysisError::ConnectionFailed { source })?;

    Ok(client)
}
