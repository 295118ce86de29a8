use super::backend::ChatMessage;
use crate::jobs::JobContext;
use crate::session::Transcript;

const INTERVIEWER_PERSONA: &str = "Your name is PrashnaAI. You are an expert AI hiring manager \
conducting a fair, unbiased technical interview. You adapt your questions to the candidate's \
answers and keep every turn concise.";

pub fn opening_question(job: &JobContext) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(INTERVIEWER_PERSONA),
        ChatMessage::user(format!(
            "Start an interview for a '{}' role. The required skills are: {}.\n\
             Greet the candidate, introduce yourself, and ask one opening question tied to one \
             of the required skills. Keep it concise.",
            job.title,
            job.skills_list()
        )),
    ]
}

pub fn next_question(transcript: &Transcript, job: &JobContext) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(INTERVIEWER_PERSONA),
        ChatMessage::user(format!(
            "You are interviewing for a '{}' role.\n\
             Conversation history:\n{}\n\n\
             Based on the candidate's last answer, ask the next logical follow-up question. \
             Do not repeat earlier questions. Make sure the required skills are eventually \
             covered: {}. Reply with the question only.",
            job.title,
            transcript.render(),
            job.skills_list()
        )),
    ]
}

pub fn evaluation(transcript: &Transcript, job: &JobContext) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(
            "You are an expert technical recruiter. You answer with a single JSON object and nothing else.",
        ),
        ChatMessage::user(format!(
            "Evaluate the following interview transcript for a '{}' role.\n\
             The required skills are: {}.\n\n\
             Transcript:\n{}\n\n\
             Your response MUST be a single valid JSON object with no introductory text and no \
             markdown formatting. It must have exactly these keys:\n\
             - \"summary\": a brief, 2-sentence overview of the candidate's performance\n\
             - \"strengths\": a list of 2-3 key strengths demonstrated\n\
             - \"weaknesses\": a list of 1-2 areas for improvement\n\
             - \"score\": a final integer score from 0 to 100\n\n\
             Example of a valid response:\n\
             {{\"summary\": \"The candidate shows strong foundations but struggles with advanced \
             concepts.\", \"strengths\": [\"Clear communication\", \"Solid core Python\"], \
             \"weaknesses\": [\"Lacked depth on database optimization\"], \"score\": 65}}",
            job.title,
            job.skills_list(),
            transcript.render()
        )),
    ]
}
