// Notes endpoints. Notes are plain values rebuilt from every response;
// nothing is cached between calls.

use super::{null_as_default, ApiClient, CallContext, ClientError, NoBody, Result};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Note {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
    /// Server-formatted creation timestamp.
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct NotesListResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: Vec<Note>,
}

#[derive(Serialize, Debug, Clone)]
pub struct CreateNoteRequest {
    pub title: String,
    pub body: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateNoteResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
}

/// Note ids are positive; anything else never reaches the network.
pub fn check_note_id(id: i64) -> Result<i64> {
    if id <= 0 {
        return Err(ClientError::InvalidId(id));
    }
    Ok(id)
}

fn note_path(id: i64) -> Result<String> {
    Ok(format!("/notes/{}", check_note_id(id)?))
}

impl ApiClient {
    /// GET /notes. An empty list is a valid answer.
    pub fn notes_list(&self, ctx: &CallContext, token: &str) -> Result<NotesListResponse> {
        self.execute_json(
            ctx,
            Method::GET,
            "/notes",
            Some(token),
            None::<&NoBody>,
            &[StatusCode::OK],
        )
    }

    /// POST /notes, expecting 201 with the new positive id.
    pub fn create_note(
        &self,
        ctx: &CallContext,
        token: &str,
        req: &CreateNoteRequest,
    ) -> Result<CreateNoteResponse> {
        let out: CreateNoteResponse = self.execute_json(
            ctx,
            Method::POST,
            "/notes",
            Some(token),
            Some(req),
            &[StatusCode::CREATED],
        )?;
        if out.id <= 0 {
            return Err(ClientError::UnexpectedResponse(
                "unexpected create note response",
            ));
        }
        Ok(out)
    }

    /// GET /notes/{id}. Non-positive ids are rejected locally.
    pub fn get_note(&self, ctx: &CallContext, token: &str, id: i64) -> Result<Note> {
        let path = note_path(id)?;
        let out: Note = self.execute_json(
            ctx,
            Method::GET,
            &path,
            Some(token),
            None::<&NoBody>,
            &[StatusCode::OK],
        )?;
        if out.id <= 0 {
            return Err(ClientError::UnexpectedResponse("unexpected get note response"));
        }
        Ok(out)
    }

    /// DELETE /notes/{id}; both 200 and 204 count as deleted.
    pub fn delete_note(&self, ctx: &CallContext, token: &str, id: i64) -> Result<()> {
        let path = note_path(id)?;
        self.execute(
            ctx,
            Method::DELETE,
            &path,
            Some(token),
            None::<&NoBody>,
            &[StatusCode::OK, StatusCode::NO_CONTENT],
        )?;
        Ok(())
    }
}
