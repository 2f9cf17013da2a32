//! Backend REST Gateway
//!
//! JSON client for the learning-management backend.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /auth/login` - Returns `{token, user}`
//! - `POST /auth/signup` - Returns `{token}`
//! - `GET /auth/users` - User directory
//!
//! ## Courses
//! - `GET /courses` - All courses
//! - `POST /courses` - Create a course (auth)
//! - `PUT /courses/:id` - Update capacity (auth)
//! - `DELETE /courses/:id` - Delete a course (auth)
//!
//! ## Enrolments
//! - `GET /enrolments/students/me/courses` - Current student's courses (auth)
//! - `GET /enrolments/courses/:id/students` - Course roster (auth)
//! - `POST /enrolments/courses/:id/enrollments` - Enroll self (auth)
//! - `DELETE /enrolments/courses/:id/students/:sid` - Remove a student (auth)
//!
//! ## Grades
//! - `GET /grades/students/me/grades` - Current student's grades (auth)
//! - `GET /grades/courses/:id/grades` - Grades of a course
//! - `GET /grades/courses/:id` - Grade records with ids
//! - `POST /grades` - Create a grade (auth)
//! - `PUT /grades/:gradeId` - Update a grade (auth)
//!
//! ## Messages
//! - `GET /messages/me` - Threads of the current user (auth)
//! - `POST /messages` - Send a message (auth)

mod client;
pub mod dto;
mod error;
mod transport;

pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, HttpTransportConfig, Method, Transport};

#[cfg(test)]
pub(crate) use transport::fake;
