// Response templates for the advising chat.
// Placeholders in braces are substituted by `composer` before sending.

/// Progress block shared by the recommendation templates.
/// Replace: {major}, {gpa}, {total_credits}, {cse_count}
pub const PROGRESS_SUMMARY: &str = "**Your Progress:**
- Major: {major}
- GPA: {gpa}
- Total Credits: {total_credits}
- Completed CSE Courses: {cse_count}";

/// Replace: {progress}, {course_list}
pub const RECOMMENDATIONS: &str = "Here is what your transcript supports next.

{progress}

**Recommended Next Courses:**
{course_list}

Each of these has every listed prerequisite satisfied by your completed coursework.

**Planning Notes:**
- Pair a systems course with a theory course to balance workload
- Check the time schedule for quarter offerings before registering
- Keep a capstone slot open for senior year

Want details on any of these courses?";

/// Replace: {progress}, {cse_count}
pub const NO_ELIGIBLE_COURSES: &str = "You have completed {cse_count} CSE course(s) so far.

{progress}

**Next Steps:**
None of the tracked upper-level courses are open to you yet. Foundational courses to look at:
- CSE 311 (Foundations of Computing I), if not completed
- CSE 312 (Foundations of Computing II), if not completed
- MATH 124/125 (Calculus I/II), if not completed

Want me to walk through your course history in more detail?";

/// Replace: {gpa}, {total_credits}, {recent_grades}, {standing}
/// `{standing}` is a full sentence, see `composer::standing_sentence`.
pub const GRADE_ANALYSIS: &str = "Your current GPA is {gpa} with {total_credits} total credits completed.

**Recent Grades:**
{recent_grades}

**Academic Standing:**
{standing}

**Suggestions:**
- Aim to maintain or raise your GPA over the next few quarters
- Consider retaking courses graded below B- if your program allows it
- Meet with your academic advisor to review your progress

Want advice on grades or course selection?";

/// Replace: {major}, {gpa}, {total_credits}, {course_count}, {cse_count}, {math_count}
pub const OVERVIEW: &str = "Your transcript is loaded. Here is where you stand:

**Major:** {major}
**GPA:** {gpa}
**Total Credits:** {total_credits}
**Completed Courses:** {course_count} total
**CSE Courses:** {cse_count}
**Math Courses:** {math_count}

I can help with:
- Course recommendations for next quarter
- Degree planning and requirements
- GPA analysis
- Prerequisite checking

What would you like to know?";

pub const UPLOAD_FOR_RECOMMENDATIONS: &str = "Happy to help with course recommendations!

Upload your transcript PDF first so I can:
- Read your completed courses and grades
- Check prerequisites for upcoming courses
- Suggest courses that fit your degree plan
- Factor in your academic standing

Once it is uploaded, ask again and you will get recommendations based on your own history.";

pub const GETTING_STARTED: &str = "To get personalized course recommendations:

1. **Upload your transcript PDF**
2. **Ask about** your courses, GPA, or degree plan
3. **Get advice** based on your academic history

I can help with:
- Course recommendations for next quarter
- Degree planning and requirements
- Prerequisite checking
- Academic progress review

Upload your transcript to begin.";

pub const GREETING: &str = "Hi! I am your academic advising assistant. I can help with:

- **Course Recommendations** from your transcript and degree plan
- **Degree Planning** toward graduation
- **Prerequisite Checking** for upcoming courses
- **GPA Analysis**

Upload your transcript PDF and ask me anything about your academic progress.";

pub const MAJOR_PLACEHOLDER: &str = "Undeclared";
pub const NO_GRADES_PLACEHOLDER: &str = "- No graded courses found";
