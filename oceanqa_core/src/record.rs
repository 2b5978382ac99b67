//! Plain persisted shape of a video, as consumed by the writer and renderer.
//!
//! ```text
//! {frames: [{objects: [{position: [x1,y1,x2,y2], class, colour, rotation}]}],
//!  events: [[string]], questions: [string], answers: [string], question_types: [int]}
//! ```

use crate::error::CoreError;
use crate::event::Event;
use crate::frame::Frame;
use crate::geometry::{BoundingBox, Rotation};
use crate::object::{Colour, ObjectClass, SceneObject};
use crate::question::QuestionTemplate;
use crate::video::{Question, Video};
use serde::{Deserialize, Serialize};

/// One object of a persisted frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub position: BoundingBox,
    pub class: ObjectClass,
    pub colour: Colour,
    pub rotation: Rotation,
}

impl From<&SceneObject> for ObjectRecord {
    fn from(obj: &SceneObject) -> Self {
        Self {
            position: obj.bbox,
            class: obj.class,
            colour: obj.colour,
            rotation: obj.rotation,
        }
    }
}

impl From<&ObjectRecord> for SceneObject {
    fn from(rec: &ObjectRecord) -> Self {
        SceneObject::new(rec.class, rec.position, rec.colour, rec.rotation)
    }
}

/// A persisted frame; static objects first, the octopus (if any) last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub objects: Vec<ObjectRecord>,
}

impl From<&Frame> for FrameRecord {
    fn from(frame: &Frame) -> Self {
        Self {
            objects: frame.objects().map(ObjectRecord::from).collect(),
        }
    }
}

impl TryFrom<&FrameRecord> for Frame {
    type Error = CoreError;

    fn try_from(rec: &FrameRecord) -> Result<Self, Self::Error> {
        let (octopi, statics): (Vec<SceneObject>, Vec<SceneObject>) = rec
            .objects
            .iter()
            .map(SceneObject::from)
            .partition(|o| o.class == ObjectClass::Octopus);

        if octopi.len() > 1 {
            return Err(CoreError::config(format!("frame holds {} octopuses", octopi.len())));
        }
        Frame::new(statics, octopi.into_iter().next())
    }
}

/// A persisted video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub frames: Vec<FrameRecord>,
    pub events: Vec<Vec<Event>>,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
    pub question_types: Vec<u8>,
}

impl From<&Video> for VideoRecord {
    fn from(video: &Video) -> Self {
        let questions = video.questions();
        Self {
            frames: video.frames().iter().map(FrameRecord::from).collect(),
            events: video.events().to_vec(),
            questions: questions.iter().map(|q| q.text.clone()).collect(),
            answers: questions.iter().map(|q| q.answer.clone()).collect(),
            question_types: questions.iter().map(|q| q.template.id()).collect(),
        }
    }
}

impl TryFrom<&VideoRecord> for Video {
    type Error = CoreError;

    fn try_from(rec: &VideoRecord) -> Result<Self, Self::Error> {
        if rec.questions.len() != rec.answers.len()
            || rec.questions.len() != rec.question_types.len()
        {
            return Err(CoreError::config(format!(
                "{} questions, {} answers and {} question types do not line up",
                rec.questions.len(),
                rec.answers.len(),
                rec.question_types.len()
            )));
        }

        let frames = rec.frames.iter().map(Frame::try_from).collect::<Result<Vec<_>, _>>()?;
        let mut video = Video::from_parts(frames, rec.events.clone())?;

        let answered = rec.questions.iter().zip(&rec.answers);
        for ((text, answer), id) in answered.zip(&rec.question_types) {
            let template = QuestionTemplate::from_id(*id)?;
            if !video.add_question(Question::new(text.clone(), template, answer.clone())) {
                return Err(CoreError::config(format!("duplicate question {:?}", text)));
            }
        }
        Ok(video)
    }
}
